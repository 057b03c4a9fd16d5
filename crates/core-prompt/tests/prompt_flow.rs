use core_events::{KeyInput, classify, parse_key};
use core_history::{Snapshot, Status};
use core_markup::AttributeRegistry;
use core_prompt::{
    Completion, CompletionOutcome, HistoryOutcome, HistorySearch, PromptEditor, PromptOutcome,
};
use pretty_assertions::assert_eq;

fn key(name: &str) -> KeyInput {
    classify(&parse_key(name).unwrap())
}

const FILES: [&str; 3] = ["Cargo.toml", "crates", "target"];

#[test]
fn type_complete_submit_recall() {
    let registry = AttributeRegistry::with_default_palette();
    let mut prompt = PromptEditor::new("def", "/work/winex");
    let mut completion = Completion::with_defaults(&registry);
    let mut history = HistorySearch::new();

    let mut last = PromptOutcome::Unchanged;
    for name in ["c", "a", "t", "space", "c", "r"] {
        last = prompt.handle_key(key(name));
    }
    assert_eq!(last, PromptOutcome::RequestCompletion { force: false });
    assert!(completion.open(&prompt, FILES, false));
    assert_eq!(completion.list().displayed(), vec!["crates"]);

    assert_eq!(
        completion.handle_key(key("tab"), &mut prompt),
        CompletionOutcome::Accepted
    );
    assert_eq!(prompt.text(), "cat crates");

    let PromptOutcome::Submit(command) = prompt.handle_key(key("enter")) else {
        panic!("enter submits");
    };
    history.add(Snapshot::new(
        prompt.mode_id(),
        command,
        Status::Failure,
        "cat: crates: Is a directory\n",
        "",
        prompt.working_dir(),
    ));
    history.add(Snapshot::new("def", "ls", Status::Success, "", "", "/work/winex"));
    prompt.reset();

    assert_eq!(prompt.handle_key(key("up")), PromptOutcome::RequestHistory);
    for name in ["c", "a", "t"] {
        history.handle_key(key(name));
    }
    assert_eq!(
        history.handle_key(key("enter")),
        HistoryOutcome::Closed { accept: true }
    );
    let recalled = history.shown().cloned().unwrap();
    assert_eq!(recalled.description, "cat: crates: Is a directory");
    prompt.load(&recalled);
    assert_eq!(prompt.text(), "cat crates");
}

#[test]
fn scripted_mark_replace() {
    let mut prompt = PromptEditor::new("def", "/tmp");
    prompt.set_text("hello world");
    for name in ["ctrl-a", "alt-f", "ctrl-space", "end", "backspace"] {
        prompt.handle_key(key(name));
    }
    assert_eq!((prompt.text(), prompt.cursor()), ("hello", 5));
}
