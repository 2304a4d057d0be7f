//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success (a run that finds no website is still a success) |
//! | 1    | General error                                             |
//! | 2    | Usage or input error (bad args, unreadable/invalid file)  |
//! | 3    | Config file failed to parse or validate                   |
//! | 4    | Persistence finished with one or more failed items        |
//! | 5    | Institutions API unreachable                              |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing or malformed input file.
pub const EXIT_USAGE: u8 = 2;

/// Config file could not be parsed or failed validation.
pub const EXIT_CONFIG_INVALID: u8 = 3;

/// `enhance --push` or `import` completed with failed items.
pub const EXIT_PERSIST_PARTIAL: u8 = 4;

/// Connection to the institutions API failed.
pub const EXIT_API_UNREACHABLE: u8 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_CONFIG_INVALID,
            EXIT_PERSIST_PARTIAL,
            EXIT_API_UNREACHABLE,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }
}
