use tlv_core::entry::SYSTEM_CHANNEL;
use tlv_core::parse_document;
use tlv_view::segment::ChannelIndex;
use tlv_view::{ResultCategory, StyleResolver, SystemChannelScan, ViewState, classify};

const SCENARIO: &str = r##"{
    "title": "Scenario",
    "logs": [
        {"name": "System", "text": "=== Chapter One ===", "isChapter": true},
        {"name": "Alice", "channel": "Main", "text": "hi"},
        {"name": "System", "channel": "Main", "text": "roll: 80>成功"}
    ],
    "characterRules": {"Alice": {"bubbleColor": "#ff0000", "bubbleOpacity": 0.5}}
}"##;

// ----------------------------------------------------------------------------
// End-to-end
// ----------------------------------------------------------------------------

#[test]
fn chapter_groups_and_classification() {
    let doc = parse_document(SCENARIO).unwrap();

    assert_eq!(doc.chapters.len(), 1);
    assert_eq!(doc.chapters[0].name, "Chapter One");
    assert_eq!(doc.chapters[0].start_index, 0);

    let view = ViewState::default();
    let groups = view.channel_groups(&doc);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].channel, SYSTEM_CHANNEL);
    assert_eq!(groups[0].messages.len(), 1);
    assert!(groups[0].messages[0].is_chapter);
    assert_eq!(groups[1].channel, "Main");
    assert_eq!(groups[1].messages.len(), 2);

    let roll = &doc.logs[2];
    let index = ChannelIndex::build(&doc.logs, SystemChannelScan::NearestSpeaker);
    assert_eq!(index.effective_channel(roll), "Main");

    assert_eq!(classify(roll), ResultCategory::Success);
}

#[test]
fn styles_resolve_through_the_document() {
    let doc = parse_document(SCENARIO).unwrap();
    let styles = StyleResolver::new(&doc);
    let alice = &doc.logs[1];
    assert!(styles.bubble(alice).to_css().contains("rgba(255, 0, 0, 0.5)"));
    assert_eq!(styles.name_color(alice), "#e6e6e6");
}

// ----------------------------------------------------------------------------
// Filtering across the engine
// ----------------------------------------------------------------------------

#[test]
fn filtered_page_still_resolves_system_lane_from_full_log() {
    let doc = parse_document(SCENARIO).unwrap();
    let mut view = ViewState::default();
    view.set_search("roll");
    let groups = view.channel_groups(&doc);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].channel, "Main");
    assert_eq!(groups[0].messages[0].text, "roll: 80>成功");
}
