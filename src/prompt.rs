use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::error::{FacegridError, Result};

pub const PROMPT: &str = "Enter keyword to search for: ";
pub const INVALID_KEYWORD: &str = "Input must be alphabetical";

/// Accept a keyword made only of letters.
pub fn validate_keyword(input: &str) -> Result<String> {
    let keyword = input.trim_end_matches(['\r', '\n']);
    if !keyword.is_empty() && keyword.chars().all(char::is_alphabetic) {
        Ok(keyword.to_string())
    } else {
        Err(FacegridError::invalid_input(format!(
            "keyword must be alphabetical, got {keyword:?}"
        )))
    }
}

/// Ask for a keyword until a valid one is entered.
pub fn prompt_keyword<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<String> {
    let io_error = |source| FacegridError::Io {
        path: PathBuf::from("<stdin>"),
        source,
    };

    loop {
        write!(output, "{PROMPT}").map_err(io_error)?;
        output.flush().map_err(io_error)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(io_error)? == 0 {
            return Err(io_error(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input closed before a keyword was entered",
            )));
        }

        match validate_keyword(&line) {
            Ok(keyword) => return Ok(keyword),
            Err(_) => writeln!(output, "{INVALID_KEYWORD}").map_err(io_error)?,
        }
    }
}
