use core_config::load_from;
use core_history::{Snapshot, Status};
use core_list::{ListStyles, SearchableList};
use core_markup::{AnsiMarkupParser, AttrSpec, AttributeRegistry};
use core_prompt::{Completion, HistorySearch, PromptEditor};
use core_text::Segment;
use std::sync::Arc;

// Mirrors the startup order of the binary: config palette overrides, then the
// built-in palette, then components built over the shared registry.
#[test]
fn configured_styles_reach_list_and_parser() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        tmp.path(),
        "[list]\nfocus = \"menu_focus\"\n\
         [palette.dropdown_marked]\nforeground = \"yellow\"\nbackground = \"black\"\n\
         [palette.menu_focus]\nforeground = \"white\"\nbackground = \"dark blue\"\n",
    )
    .unwrap();
    let config = load_from(Some(tmp.path().to_path_buf())).unwrap();

    let registry = Arc::new(AttributeRegistry::new());
    assert_eq!(config.apply_palette(&registry), 2);
    registry.register_default_palette();
    assert_eq!(
        registry.spec_for_key("dropdown_marked"),
        Some(AttrSpec::new("yellow", "black"))
    );

    let list_cfg = &config.file.list;
    let styles = ListStyles {
        plain: list_cfg.plain.clone(),
        marked: list_cfg.marked.clone(),
        focus: list_cfg.focus.clone(),
    };
    let seeded = registry.len();
    let mut list = SearchableList::new(&registry, styles);
    assert_eq!(registry.len(), seeded);
    list.set_content(["alpha", "beta"], false);
    assert_eq!(
        list.render()[0].segments,
        vec![Segment::styled("menu_focus", "alpha")]
    );

    let parser = AnsiMarkupParser::new(Arc::clone(&registry));
    parser.parse("\x1b[31mred\x1b[0m");
    assert_eq!(registry.len(), seeded + 1);
}

#[test]
fn clamped_limits_bound_history_and_popup() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), "[history]\ncapacity = 0\n[completion]\nmax_height = 0\n").unwrap();
    let config = load_from(Some(tmp.path().to_path_buf())).unwrap();

    let mut history = HistorySearch::with_capacity(config.file.history.capacity);
    for cmd in ["ls", "pwd"] {
        history.add(Snapshot::new("def", cmd, Status::Success, "", "", "/tmp"));
    }
    assert_eq!(history.ring().len(), 1);

    let registry = AttributeRegistry::with_default_palette();
    let mut completion = Completion::new(
        &registry,
        ListStyles::default(),
        config.file.completion.max_height,
    );
    let prompt = PromptEditor::new("def", "/tmp");
    assert!(completion.open(&prompt, ["a", "b", "c"], true));
    assert_eq!(completion.popup_height(), 1);
}
