use std::io::{self, BufRead, Write};

use url::{form_urlencoded, Url};

/// Answers the prompts servers send with an input status.
pub trait InputProvider: Send + Sync {
    /// `None` declines the prompt and ends the fetch.
    fn provide(&self, prompt: &str, sensitive: bool) -> Option<String>;
}

/// Declines every prompt; the default for unattended runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputProvider for NoInput {
    fn provide(&self, _prompt: &str, _sensitive: bool) -> Option<String> {
        None
    }
}

/// Asks on the terminal. An empty line or closed stdin declines.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl InputProvider for StdinPrompt {
    fn provide(&self, prompt: &str, sensitive: bool) -> Option<String> {
        let mut stderr = io::stderr();
        let marker = if sensitive { " (sensitive)" } else { "" };
        let _ = write!(stderr, "INPUT{marker} {prompt}> ");
        let _ = stderr.flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let answer = answer.trim_end_matches(['\r', '\n']);
                (!answer.is_empty()).then(|| answer.to_string())
            }
        }
    }
}

/// Replace the query of `url` with the percent-encoded `value`.
pub fn with_query(url: &Url, value: &str) -> Url {
    // form encoding writes spaces as '+'; a literal '+' is already %2B.
    let encoded = form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    let mut next = url.clone();
    next.set_query(Some(&encoded));
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_replaces_previous_answer() {
        let url = Url::parse("gemini://host/search?old").unwrap();
        let next = with_query(&url, "rust & gemini+tls");
        assert_eq!(
            next.as_str(),
            "gemini://host/search?rust%20%26%20gemini%2Btls"
        );
    }
}
