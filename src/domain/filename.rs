//! Best-effort metadata guesses from filename conventions.
//!
//! Pure string code, no I/O. Handles the usual rip/download naming schemes:
//! "01. Artist - Title.mp3", "01 - Artist - Title.mp3", "Artist - Title.mp3",
//! "artist-title.mp3". Total: always yields at least a title (the stem).

/// Fields guessed from a filename. Lowest-precedence metadata source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilenameGuess {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub track_num: Option<u32>,
}

pub fn parse_filename(filename: &str) -> FilenameGuess {
    let mut guess = FilenameGuess::default();

    let mut name = strip_extension(filename);

    // Leading track number: one or two digits followed by separators.
    if let Some((num, rest)) = split_track_prefix(name) {
        guess.track_num = Some(num);
        name = rest;
    }

    if name.contains(" - ") {
        let parts: Vec<&str> = name.split(" - ").collect();
        match parts.len() {
            2 => {
                guess.artist = non_empty(parts[0]);
                guess.title = non_empty(parts[1]);
            }
            3 => {
                guess.artist = non_empty(parts[0]);
                guess.album = non_empty(parts[1]);
                guess.title = non_empty(parts[2]);
            }
            _ => {
                guess.artist = non_empty(parts[0]);
                guess.title = non_empty(parts[parts.len() - 1]);
            }
        }
    } else if let Some((left, right)) = name.split_once('-') {
        // "artist-title" with no spaces before the hyphen; underscores stand
        // in for spaces in this convention.
        if !left.contains(' ') && !left.is_empty() {
            guess.artist = non_empty(&title_case(&left.replace('_', " ")));
            guess.title = non_empty(&title_case(&right.replace('_', " ")));
        }
    }

    if guess.title.is_none() {
        guess.title = non_empty(name).or_else(|| Some(strip_extension(filename).to_string()));
    }

    guess
}

fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}

fn split_track_prefix(name: &str) -> Option<(u32, &str)> {
    let digits: String = name.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || digits.len() > 2 {
        return None;
    }
    let rest = &name[digits.len()..];
    let trimmed = rest.trim_start_matches(['.', '-', ' ']);
    // Require at least one separator so "99Problems" keeps its digits.
    if trimmed.len() == rest.len() || trimmed.is_empty() {
        return None;
    }
    let num = digits.parse().ok()?;
    Some((num, trimmed))
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
