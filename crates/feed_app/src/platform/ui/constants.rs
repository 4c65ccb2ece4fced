pub const CMD_NEXT: &str = ":next";
pub const CMD_PREV: &str = ":prev";
pub const CMD_CLEAR: &str = ":clear";
pub const CMD_QUIT: &str = ":quit";

pub const PROMPT_HELP: &str = "Type to search. Commands: :prev :next :clear :quit";
pub const RULE: &str = "----------------------------------------";
