//! Merge of capture messages into request records.
//!
//! `reqSend` and `respData` may arrive before the `req` that creates their
//! record. Those are stashed by id and folded in when the `req` shows up.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use super::message::{CaptureInfo, CaptureMessage, ResourceKind};
use super::record::CaptureRecord;

/// Which resource kinds are listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindFilter {
    enabled: BTreeSet<ResourceKind>,
}

impl Default for KindFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl KindFilter {
    pub fn all() -> Self {
        Self {
            enabled: ResourceKind::ALL.into_iter().collect(),
        }
    }

    pub fn only(kinds: impl IntoIterator<Item = ResourceKind>) -> Self {
        Self {
            enabled: kinds.into_iter().collect(),
        }
    }

    pub fn set(&mut self, kind: ResourceKind, enabled: bool) {
        if enabled {
            self.enabled.insert(kind);
        } else {
            self.enabled.remove(&kind);
        }
    }

    pub fn allows(&self, kind: ResourceKind) -> bool {
        self.enabled.contains(&kind)
    }
}

/// Restrict the listing to one browser tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TabFilter {
    #[default]
    All,
    Tab(i64),
}

impl TabFilter {
    pub fn matches(&self, tab_id: i64) -> bool {
        match self {
            TabFilter::All => true,
            TabFilter::Tab(t) => *t == tab_id,
        }
    }
}

impl From<Option<i64>> for TabFilter {
    fn from(tab: Option<i64>) -> Self {
        tab.map_or(TabFilter::All, TabFilter::Tab)
    }
}

/// Request log built from a stream of [`CaptureMessage`]s.
#[derive(Debug, Default)]
pub struct CaptureLog {
    records: HashMap<String, CaptureRecord>,
    early_send: HashMap<String, CaptureInfo>,
    early_data: HashMap<String, CaptureInfo>,
}

impl CaptureLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a log from a complete message sequence.
    pub fn from_messages(messages: impl IntoIterator<Item = CaptureMessage>) -> Self {
        let mut log = Self::new();
        for m in messages {
            log.apply(m);
        }
        log
    }

    pub fn apply(&mut self, message: CaptureMessage) {
        match message {
            CaptureMessage::Init => tracing::trace!("capture init"),
            CaptureMessage::Req { info } => {
                let mut record = CaptureRecord::from_info(&info);
                if let Some(data) = self.early_data.remove(&info.id) {
                    apply_data(&mut record, data);
                }
                if let Some(send) = self.early_send.remove(&info.id) {
                    apply_send(&mut record, send);
                }
                self.records.insert(info.id, record);
            }
            CaptureMessage::ReqSend { info } => match self.records.get_mut(&info.id) {
                Some(record) => apply_send(record, info),
                None => {
                    self.early_send.insert(info.id.clone(), info);
                }
            },
            CaptureMessage::RespData { info } => match self.records.get_mut(&info.id) {
                Some(record) => apply_data(record, info),
                None => {
                    self.early_data.insert(info.id.clone(), info);
                }
            },
            CaptureMessage::ReqEnd { .. } | CaptureMessage::ReqErr { .. } => {}
        }
    }

    /// Drops every record and anything stashed.
    pub fn clear(&mut self) {
        self.records.clear();
        self.early_send.clear();
        self.early_data.clear();
    }

    pub fn get(&self, id: &str) -> Option<&CaptureRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Messages waiting for their `req`.
    pub fn stashed_len(&self) -> usize {
        self.early_send.len() + self.early_data.len()
    }

    /// All records in id order.
    pub fn records(&self) -> Vec<&CaptureRecord> {
        let mut rows: Vec<&CaptureRecord> = self.records.values().collect();
        rows.sort_by(|a, b| compare_ids(&a.id, &b.id));
        rows
    }

    /// Records passing both filters, in id order.
    pub fn filtered(&self, kinds: &KindFilter, tab: TabFilter) -> Vec<&CaptureRecord> {
        self.records()
            .into_iter()
            .filter(|r| kinds.allows(r.kind) && tab.matches(r.tab_id))
            .collect()
    }
}

fn apply_send(record: &mut CaptureRecord, info: CaptureInfo) {
    record.request_headers = info.req_header.unwrap_or_default();
}

fn apply_data(record: &mut CaptureRecord, info: CaptureInfo) {
    record.size = info.length;
    record.body_chunks = info.b64_list.unwrap_or_default();
}

/// Numeric ids sort numerically, before any non-numeric ones.
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::HeaderEntry;

    fn info(id: &str) -> CaptureInfo {
        CaptureInfo {
            id: id.into(),
            tab_id: 1,
            url: format!("https://example.com/{}", id),
            ..CaptureInfo::default()
        }
    }

    fn req(id: &str, tab: i64, kind: ResourceKind) -> CaptureMessage {
        CaptureMessage::Req {
            info: CaptureInfo {
                tab_id: tab,
                kind,
                length: Some(1),
                ..info(id)
            },
        }
    }

    fn send(id: &str) -> CaptureMessage {
        CaptureMessage::ReqSend {
            info: CaptureInfo {
                req_header: Some(vec![HeaderEntry::new("Accept", "*/*")]),
                ..info(id)
            },
        }
    }

    fn data(id: &str, len: u64) -> CaptureMessage {
        CaptureMessage::RespData {
            info: CaptureInfo {
                length: Some(len),
                b64_list: Some(vec!["aGk=".into()]),
                ..info(id)
            },
        }
    }

    #[test]
    fn merges_in_order() {
        let mut log = CaptureLog::new();
        log.apply(CaptureMessage::Init);
        log.apply(req("5", 1, ResourceKind::Media));
        log.apply(send("5"));
        log.apply(data("5", 2));
        let r = log.get("5").unwrap();
        assert_eq!(r.request_headers.len(), 1);
        assert_eq!(r.size, Some(2));
        assert_eq!(r.body_text(), "hi");
    }

    #[test]
    fn early_messages_are_folded_in() {
        let mut log = CaptureLog::new();
        log.apply(data("9", 2));
        log.apply(send("9"));
        assert!(log.is_empty());
        assert_eq!(log.stashed_len(), 2);

        log.apply(req("9", 1, ResourceKind::Data));
        assert_eq!(log.stashed_len(), 0);
        let r = log.get("9").unwrap();
        assert_eq!(r.size, Some(2));
        assert_eq!(r.body_chunks, vec!["aGk=".to_string()]);
        assert_eq!(r.request_headers[0].name, "Accept");
    }

    #[test]
    fn end_and_error_ignored() {
        let mut log = CaptureLog::new();
        log.apply(CaptureMessage::ReqEnd { info: info("1") });
        log.apply(CaptureMessage::ReqErr { info: info("1") });
        assert!(log.is_empty());
        assert_eq!(log.stashed_len(), 0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut log = CaptureLog::from_messages([req("1", 1, ResourceKind::Html), data("2", 1)]);
        assert_eq!(log.len(), 1);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.stashed_len(), 0);
        // A stash dropped by clear does not resurface.
        log.apply(req("2", 1, ResourceKind::Html));
        assert_eq!(log.get("2").unwrap().size, Some(1));
        assert!(log.get("2").unwrap().body_chunks.is_empty());
    }

    #[test]
    fn listing_order_and_filters() {
        let log = CaptureLog::from_messages([
            req("10", 1, ResourceKind::Media),
            req("9", 2, ResourceKind::Image),
            req("100", 1, ResourceKind::Js),
            req("2", 2, ResourceKind::Media),
        ]);
        let ids: Vec<&str> = log.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["2", "9", "10", "100"]);

        let media = KindFilter::only([ResourceKind::Media]);
        let ids: Vec<&str> = log
            .filtered(&media, TabFilter::All)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["2", "10"]);

        let ids: Vec<&str> = log
            .filtered(&KindFilter::all(), TabFilter::Tab(2))
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["2", "9"]);

        let mut no_images = KindFilter::default();
        no_images.set(ResourceKind::Image, false);
        assert_eq!(log.filtered(&no_images, TabFilter::from(Some(2))).len(), 1);
    }
}
