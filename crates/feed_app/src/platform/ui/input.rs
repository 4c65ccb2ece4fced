use feed_core::Msg;

use super::constants::*;

/// Maps one line of terminal input to a controller message.
///
/// Known `:` commands act as the buttons; any other line replaces the search
/// text verbatim, so an empty line clears the filter.
pub fn parse_line(line: &str) -> Msg {
    match line.trim() {
        CMD_NEXT => Msg::NextClicked,
        CMD_PREV => Msg::PrevClicked,
        CMD_CLEAR => Msg::ClearClicked,
        CMD_QUIT => Msg::Unmounted,
        _ => Msg::SearchEdited(line.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string()),
    }
}
