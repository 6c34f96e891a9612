//! # Script Analyzer
//!
//! Asks the LLM to break a script down into key points and characters and
//! parses its loosely structured reply.

use std::{path::Path, sync::LazyLock};

use regex::Regex;

use crate::TextCompletionProvider;

pub const ANALYSIS_INSTRUCTION: &str =
    "Analyze the following script and list the key points and characters:";

static NUMBERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.").expect("valid numbered item regex"));

/// Key points and characters in the order the LLM listed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptAnalysis {
    pub key_points: Vec<String>,
    pub characters: Vec<String>,
}

/// Turns an LLM reply into a [`ScriptAnalysis`]
pub trait ResponseParser {
    fn parse(&self, response: &str) -> ScriptAnalysis;
}

impl<P: ResponseParser> ResponseParser for &P {
    fn parse(&self, response: &str) -> ScriptAnalysis {
        (**self).parse(response)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    KeyPoints,
    Characters,
}

/// Reads `Key Points` / `Characters` headings followed by bulleted or
/// numbered lists
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionListParser;

impl SectionListParser {
    /// `- ` or `* ` bullets are list items even when the text reads like a
    /// heading
    fn is_bullet(line: &str) -> bool {
        line.strip_prefix(['-', '*'])
            .is_some_and(|rest| rest.starts_with(char::is_whitespace))
    }

    fn heading(line: &str) -> Option<Section> {
        if Self::is_bullet(line) {
            return None;
        }

        let heading = line
            .trim_start_matches(['#', '*'])
            .trim_start()
            .to_lowercase();
        if heading.starts_with("key points") {
            Some(Section::KeyPoints)
        } else if heading.starts_with("characters") {
            Some(Section::Characters)
        } else {
            None
        }
    }

    fn list_item(line: &str) -> Option<&str> {
        let is_item =
            line.starts_with('-') || line.starts_with('*') || NUMBERED_ITEM_RE.is_match(line);
        if !is_item {
            return None;
        }

        let item = line
            .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '-' | '*' | '.' | ' '))
            .trim();
        (!item.is_empty()).then_some(item)
    }
}

impl ResponseParser for SectionListParser {
    fn parse(&self, response: &str) -> ScriptAnalysis {
        let mut analysis = ScriptAnalysis::default();
        let mut section = Section::None;

        for line in response.lines().map(str::trim) {
            if let Some(next) = Self::heading(line) {
                section = next;
                continue;
            }

            let Some(item) = Self::list_item(line) else {
                continue;
            };
            match section {
                Section::KeyPoints => analysis.key_points.push(item.to_string()),
                Section::Characters => analysis.characters.push(item.to_string()),
                Section::None => {}
            }
        }

        analysis
    }
}

/// Runs the analysis prompt for the script at `script_path`.
///
/// Any failure is logged and yields an empty analysis; deciding whether that
/// is fatal is left to the caller.
#[tracing::instrument(skip(llm, parser))]
pub async fn analyze_script<T, P>(llm: &T, parser: &P, script_path: &Path) -> ScriptAnalysis
where
    T: TextCompletionProvider,
    P: ResponseParser,
{
    let script = match tokio::fs::read_to_string(script_path).await {
        Ok(script) => script,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read script");
            return ScriptAnalysis::default();
        }
    };

    let prompt = format!("{ANALYSIS_INSTRUCTION}\n\n{script}");
    let response = match llm.complete(&prompt).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, provider = T::PROVIDER_NAME, "Script analysis failed");
            return ScriptAnalysis::default();
        }
    };

    let analysis = parser.parse(response.trim());
    tracing::info!(
        key_points = analysis.key_points.len(),
        characters = analysis.characters.len(),
        "Extracted key points and characters"
    );
    analysis
}
