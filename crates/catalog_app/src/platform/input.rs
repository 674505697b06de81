use catalog_core::SortOption;

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text; an empty line clears the filter.
    Search(String),
    LoadMore,
    Sort(Option<SortOption>),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Search(line.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "more" | "m" => Command::LoadMore,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "sort" | "s" => match arg {
            "" | "none" | "off" => Command::Sort(None),
            key => match key.parse::<SortOption>() {
                Ok(option) => Command::Sort(Some(option)),
                Err(err) => Command::Unknown(err.to_string()),
            },
        },
        other => Command::Unknown(format!("unknown command /{other}")),
    }
}

pub const HELP: &str = "\
Type a name and press Enter to search; an empty line lists everyone.
  /more              load the next page
  /sort a-z|z-a|male|female|none
  /help              show this help
  /quit              leave";
