//! Subcommand drivers. Each reads its input, runs one engine component and
//! writes JSON to `out`.

use anyhow::{Context, Result};
use core_config::ConfigFile;
use core_events::{classify, parse_key};
use core_history::{Snapshot, Status};
use core_list::{ListStyles, SearchableList};
use core_markup::{AnsiMarkupParser, AttrSpec, AttributeRegistry};
use core_prompt::{Completion, HistoryOutcome, HistorySearch, PromptEditor, PromptOutcome};
use core_text::Segment;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Serialize)]
struct MarkupLine<'a> {
    line: usize,
    segments: &'a [Segment],
}

#[derive(Serialize)]
struct RegistryEntry<'a> {
    key: &'a str,
    #[serde(flatten)]
    spec: &'a AttrSpec,
}

#[derive(Serialize)]
struct RegistrySummary<'a> {
    registry: Vec<RegistryEntry<'a>>,
}

/// One JSON line of segments per input line, then the registry contents.
pub fn markup(registry: Arc<AttributeRegistry>, input: impl BufRead, mut out: impl Write) -> Result<()> {
    let parser = AnsiMarkupParser::new(registry);
    let mut count = 0usize;
    for (idx, line) in input.lines().enumerate() {
        let line = line.context("reading markup input")?;
        let segments = parser.parse(&line);
        serde_json::to_writer(
            &mut out,
            &MarkupLine {
                line: idx + 1,
                segments: &segments,
            },
        )?;
        writeln!(out)?;
        count += 1;
    }
    let entries = parser.registry().entries();
    let summary = RegistrySummary {
        registry: entries
            .iter()
            .map(|(key, spec)| RegistryEntry { key, spec })
            .collect(),
    };
    serde_json::to_writer(&mut out, &summary)?;
    writeln!(out)?;
    info!(target: "runtime.markup", lines = count, registered = entries.len(), "markup_done");
    Ok(())
}

#[derive(Serialize)]
struct RowOut<'a> {
    focused: bool,
    segments: &'a [Segment],
}

#[derive(Serialize)]
struct FilterView<'a> {
    pattern: &'a str,
    filtered: bool,
    error: Option<String>,
    height: usize,
    width: usize,
    selected: Option<String>,
    rows: Vec<RowOut<'a>>,
}

/// Filter candidate lines from `input` through `pattern` and print the view.
pub fn filter(
    registry: &AttributeRegistry,
    styles: ListStyles,
    pattern: &str,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    let items = input
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .context("reading candidate lines")?;
    let mut list = SearchableList::new(registry, styles);
    list.set_content(items, false);
    let error = match list.try_filter(pattern) {
        Ok(_) => None,
        Err(e) => {
            warn!(target: "runtime.filter", error = %e, "pattern_invalid");
            list.filter(pattern);
            Some(e.to_string())
        }
    };
    let rendered = list.render();
    let view = FilterView {
        pattern,
        filtered: list.is_filtered(),
        error,
        height: list.content_height(),
        width: list.max_width(),
        selected: list.selected(),
        rows: rendered
            .iter()
            .map(|r| RowOut {
                focused: r.focused,
                segments: &r.segments,
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut out, &view)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct EditResult {
    text: String,
    cursor: usize,
    marking: bool,
    outcomes: Vec<String>,
    markup: Vec<Segment>,
    popup: Option<Vec<String>>,
    popup_height: usize,
    history: usize,
}

/// Input for the `edit` driver: starting text, key names, completion
/// candidates and previously run commands (oldest first).
#[derive(Debug, Default)]
pub struct EditScript {
    pub text: String,
    pub keys: Vec<String>,
    pub candidates: Vec<String>,
    pub history: Vec<String>,
}

/// Which widget receives the next key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Prompt,
    Completion,
    History,
}

/// Replay a key script over `script.text` (cursor at the end). The prompt,
/// completion popup and history search hand keys to each other the way an
/// interactive session would.
pub fn edit(
    config: &ConfigFile,
    registry: &AttributeRegistry,
    script: &EditScript,
    working_dir: PathBuf,
    mut out: impl Write,
) -> Result<()> {
    let mut prompt =
        PromptEditor::new("def", working_dir).with_min_prefix(config.completion.min_prefix);
    let mut completion = Completion::new(
        registry,
        list_styles(config),
        config.completion.max_height,
    );
    let mut history = HistorySearch::with_capacity(config.history.capacity);
    for command in &script.history {
        history.add(Snapshot::new(
            "def",
            command.as_str(),
            Status::Success,
            "",
            "",
            prompt.working_dir(),
        ));
    }
    prompt.set_text(&script.text);

    let mut focus = Focus::Prompt;
    let mut outcomes = Vec::with_capacity(script.keys.len());
    for name in &script.keys {
        let event = parse_key(name).with_context(|| format!("key `{name}`"))?;
        let input = classify(&event);
        let (label, quit) = match focus {
            Focus::Completion => {
                let outcome = completion.handle_key(input, &mut prompt);
                if !completion.is_open() {
                    focus = Focus::Prompt;
                }
                (format!("{outcome:?}"), false)
            }
            Focus::History => {
                let outcome = history.handle_key(input);
                if let HistoryOutcome::Closed { accept } = outcome {
                    focus = Focus::Prompt;
                    if let Some(snapshot) = history.shown().filter(|_| accept) {
                        prompt.load(snapshot);
                    }
                }
                (format!("{outcome:?}"), false)
            }
            Focus::Prompt => {
                let outcome = prompt.handle_key(input);
                match &outcome {
                    PromptOutcome::RequestCompletion { force } => {
                        if completion.open(&prompt, script.candidates.iter().cloned(), *force) {
                            focus = Focus::Completion;
                        }
                    }
                    PromptOutcome::RequestHistory => focus = Focus::History,
                    PromptOutcome::Submit(command) => {
                        history.add(Snapshot::new(
                            prompt.mode_id(),
                            command.as_str(),
                            Status::Init,
                            "",
                            "",
                            prompt.working_dir(),
                        ));
                        prompt.reset();
                    }
                    _ => {}
                }
                (format!("{outcome:?}"), outcome == PromptOutcome::Quit)
            }
        };
        debug!(target: "runtime.edit", key = %name, outcome = %label, focus = ?focus, "replay");
        outcomes.push(label);
        if quit {
            break;
        }
    }
    let popup = completion.is_open().then(|| {
        completion
            .list()
            .displayed()
            .into_iter()
            .map(String::from)
            .collect()
    });
    let result = EditResult {
        text: prompt.text().to_string(),
        cursor: prompt.cursor(),
        marking: prompt.buffer().is_marking(),
        outcomes,
        markup: prompt.buffer().render(),
        popup,
        popup_height: completion.popup_height(),
        history: history.ring().len(),
    };
    serde_json::to_writer_pretty(&mut out, &result)?;
    writeln!(out)?;
    Ok(())
}

/// List styles named by the `[list]` section.
pub fn list_styles(config: &ConfigFile) -> ListStyles {
    ListStyles {
        plain: config.list.plain.clone(),
        marked: config.list.marked.clone(),
        focus: config.list.focus.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn lines(out: &[u8]) -> Vec<Value> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn markup_emits_segments_then_registry() {
        let registry = Arc::new(AttributeRegistry::new());
        let mut out: Vec<u8> = Vec::new();
        markup(
            Arc::clone(&registry),
            "Hi \x1b[01;34mthere\x1b[0m!\nplain\n".as_bytes(),
            &mut out,
        )
        .unwrap();
        let v = lines(&out);
        assert_eq!(v.len(), 3);
        assert_eq!(
            v[0],
            json!({"line": 1, "segments": [
                {"style": null, "text": "Hi "},
                {"style": "01;34", "text": "there"},
                {"style": null, "text": "!"},
            ]})
        );
        assert_eq!(v[1]["segments"][0]["text"], "plain");
        assert_eq!(
            v[2],
            json!({"registry": [{"key": "01;34", "foreground": "bold,dark blue", "background": ""}]})
        );
    }

    #[test]
    fn filter_prints_highlighted_rows() {
        let registry = AttributeRegistry::new();
        let mut out: Vec<u8> = Vec::new();
        filter(
            &registry,
            ListStyles::default(),
            "co",
            "cat\ndog\ncow\nscow\n".as_bytes(),
            &mut out,
        )
        .unwrap();
        let v: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["filtered"], true);
        assert_eq!(v["height"], 2);
        assert_eq!(v["selected"], "cow");
        assert_eq!(
            v["rows"][1]["segments"],
            json!([
                {"style": "dropdown_plain", "text": "s"},
                {"style": "dropdown_marked", "text": "co"},
                {"style": "dropdown_plain", "text": "w"},
            ])
        );
    }

    #[test]
    fn filter_reports_invalid_pattern() {
        let registry = AttributeRegistry::new();
        let mut out: Vec<u8> = Vec::new();
        filter(&registry, ListStyles::default(), "(", "a\nb\n".as_bytes(), &mut out).unwrap();
        let v: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["filtered"], false);
        assert_eq!(v["height"], 2);
        assert!(v["error"].as_str().unwrap().contains("invalid search pattern"));
    }

    fn script(text: &str, keys: &[&str]) -> EditScript {
        EditScript {
            text: text.to_string(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
            ..EditScript::default()
        }
    }

    fn run_edit(config: &ConfigFile, script: &EditScript) -> Value {
        let registry = AttributeRegistry::with_default_palette();
        let mut out: Vec<u8> = Vec::new();
        edit(config, &registry, script, PathBuf::from("/tmp"), &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn edit_replays_key_script() {
        let s = script("hello world", &["ctrl-a", "alt-f", "ctrl-space", "end", "backspace"]);
        let v = run_edit(&ConfigFile::default(), &s);
        assert_eq!(v["text"], "hello");
        assert_eq!(v["cursor"], 5);
        assert_eq!(v["marking"], false);
        assert_eq!(v["outcomes"].as_array().unwrap().len(), 5);
        assert_eq!(v["popup"], Value::Null);
    }

    #[test]
    fn edit_stops_at_quit_and_rejects_unknown_keys() {
        let v = run_edit(&ConfigFile::default(), &script("", &["x", "alt-q", "y"]));
        assert_eq!(v["text"], "x");
        assert_eq!(v["outcomes"], json!(["Changed", "Quit"]));

        let registry = AttributeRegistry::new();
        let bad = script("", &["hyper-x"]);
        let err = edit(
            &ConfigFile::default(),
            &registry,
            &bad,
            PathBuf::from("/tmp"),
            Vec::<u8>::new(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("unknown modifier"));
    }

    #[test]
    fn edit_popup_height_follows_config() {
        let mut config = ConfigFile::default();
        config.completion.max_height = 2;
        let mut s = script("vi ", &["tab"]);
        s.candidates = ["a", "b", "c", "d"].into_iter().map(String::from).collect();
        let v = run_edit(&config, &s);
        assert_eq!(v["popup"], json!(["a", "b", "c", "d"]));
        assert_eq!(v["popup_height"], 2);
    }

    #[test]
    fn edit_completes_then_submits_into_bounded_history() {
        let mut config = ConfigFile::default();
        config.history.capacity = 2;
        let mut s = script("cat ", &["c", "r", "enter", "enter"]);
        s.candidates = vec!["Cargo.toml".into(), "crates".into()];
        s.history = vec!["ls".into(), "pwd".into()];
        let v = run_edit(&config, &s);
        assert_eq!(
            v["outcomes"],
            json!([
                "Changed",
                "RequestCompletion { force: false }",
                "Accepted",
                "Submit(\"cat crates\")"
            ])
        );
        assert_eq!(v["text"], "");
        assert_eq!(v["history"], 2);
    }

    #[test]
    fn edit_recalls_from_history_search() {
        let mut s = script("", &["up", "l", "enter"]);
        s.history = vec!["ls -la".into(), "pwd".into()];
        let v = run_edit(&ConfigFile::default(), &s);
        assert_eq!(v["outcomes"], json!(["RequestHistory", "Changed", "Closed { accept: true }"]));
        assert_eq!(v["text"], "ls -la");
    }
}
