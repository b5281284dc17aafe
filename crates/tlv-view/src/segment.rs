//! Channel segmentation: grouping a visible run of entries into contiguous
//! channel groups.
//!
//! System lines do not trust their own `channel` field. Their effective
//! channel is borrowed from the nearest preceding character line in the full
//! log, so a roll announced by the system lands in the lane it belongs to.

use std::collections::BTreeMap;

use serde::Serialize;
use tlv_core::entry::{DEFAULT_CHANNEL, SYSTEM_CHANNEL};
use tlv_core::{Document, LogEntry};

use crate::config::SystemChannelScan;

/// Channel name fragments that mark a lane as off-topic chatter.
pub const OFF_TOPIC_KEYWORDS: [&str; 6] = ["闲聊", "other", "其他", "聊天", "杂谈", "闲谈"];

/// Whether a channel is off-topic chatter rather than the main story.
pub fn is_non_main_channel(channel: &str) -> bool {
    if channel.is_empty() {
        return false;
    }
    let lower = channel.to_lowercase();
    OFF_TOPIC_KEYWORDS.iter().any(|k| lower.contains(&k.to_lowercase()))
}

fn own_channel(entry: &LogEntry) -> &str {
    if entry.channel.is_empty() {
        DEFAULT_CHANNEL
    } else {
        &entry.channel
    }
}

fn counts_for_scan(entry: &LogEntry, policy: SystemChannelScan) -> bool {
    if !entry.is_speaker() {
        return false;
    }
    match policy {
        SystemChannelScan::NearestSpeaker => true,
        SystemChannelScan::SkipOffTopic => !is_non_main_channel(own_channel(entry)),
    }
}

/// Literal backward scan from `index` for the channel a system line belongs
/// to. Returns the system channel when nothing qualifies.
pub fn scan_system_channel(log: &[LogEntry], index: usize, policy: SystemChannelScan) -> &str {
    log[..index.min(log.len())]
        .iter()
        .rev()
        .find(|e| counts_for_scan(e, policy))
        .map_or(SYSTEM_CHANNEL, own_channel)
}

/// For every log position, the position of the character line a system line
/// at that position would borrow its channel from.
///
/// Built in one forward pass; lookups agree with [`scan_system_channel`].
#[derive(Debug, Clone)]
pub struct ChannelIndex<'a> {
    log: &'a [LogEntry],
    source: Vec<Option<usize>>,
}

impl<'a> ChannelIndex<'a> {
    /// Precompute lookups for `log` under `policy`.
    pub fn build(log: &'a [LogEntry], policy: SystemChannelScan) -> Self {
        let mut source = Vec::with_capacity(log.len());
        let mut last = None;
        for (i, entry) in log.iter().enumerate() {
            source.push(last);
            if counts_for_scan(entry, policy) {
                last = Some(i);
            }
        }
        tracing::trace!(entries = log.len(), ?policy, "built channel index");
        Self { log, source }
    }

    /// The channel a system line at `index` borrows.
    pub fn system_channel(&self, index: usize) -> &'a str {
        self.source
            .get(index)
            .copied()
            .flatten()
            .and_then(|i| self.log.get(i))
            .map_or(SYSTEM_CHANNEL, own_channel)
    }

    /// The lane an entry is displayed in.
    pub fn effective_channel<'e>(&self, entry: &'e LogEntry) -> &'e str
    where
        'a: 'e,
    {
        if entry.is_chapter {
            SYSTEM_CHANNEL
        } else if entry.is_system() {
            if entry.channel == SYSTEM_CHANNEL {
                SYSTEM_CHANNEL
            } else {
                self.system_channel(entry.index)
            }
        } else {
            own_channel(entry)
        }
    }
}

/// A contiguous run of entries displayed in one lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelGroup<'a> {
    /// The lane's channel name.
    pub channel: String,
    /// Entries in display order.
    pub messages: Vec<&'a LogEntry>,
}

impl ChannelGroup<'_> {
    /// Whether this group is a chapter banner.
    pub fn is_chapter(&self) -> bool {
        self.messages.first().is_some_and(|m| m.is_chapter)
    }
}

/// Group `visible` (a filtered, paginated slice of `log`) into lanes.
///
/// A new group starts whenever the effective channel changes, and always at
/// a chapter marker. System lines following a chapter share its lane.
pub fn channel_groups<'a>(
    log: &[LogEntry],
    visible: impl IntoIterator<Item = &'a LogEntry>,
    policy: SystemChannelScan,
) -> Vec<ChannelGroup<'a>> {
    let index = ChannelIndex::build(log, policy);
    let mut groups: Vec<ChannelGroup<'a>> = Vec::new();

    for entry in visible {
        let channel = index.effective_channel(entry);
        match groups.last_mut() {
            Some(group) if !entry.is_chapter && group.channel == channel => {
                group.messages.push(entry);
            }
            _ => groups.push(ChannelGroup {
                channel: channel.to_string(),
                messages: vec![entry],
            }),
        }
    }

    tracing::trace!(groups = groups.len(), "segmented channels");
    groups
}

/// Whether a channel is shown collapsed, given the viewer's own toggles.
///
/// Precedence: viewer toggle, channel rule, the document's collapsed-channel
/// map, then auto-collapse of off-topic lanes.
pub fn is_channel_collapsed(
    doc: &Document,
    toggles: &BTreeMap<String, bool>,
    channel: &str,
) -> bool {
    if let Some(&collapsed) = toggles.get(channel) {
        return collapsed;
    }
    if let Some(collapsed) = doc.channel_rules.get(channel).and_then(|r| r.collapsed) {
        return collapsed;
    }
    let global = &doc.global_channel_settings;
    if let Some(&collapsed) = global.collapsed_channels.get(channel) {
        return collapsed;
    }
    global.auto_collapse_other == Some(true) && is_non_main_channel(channel)
}
