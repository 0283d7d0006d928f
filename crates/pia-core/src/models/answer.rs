use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The payload of an answer. Fields co-occur: a gauge question usually also
/// carries a justification text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauge: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<String>>,
}

impl AnswerData {
    /// Gauge value if it is set and not the "unrated" zero.
    pub fn gauge(&self) -> Option<u8> {
        self.gauge.filter(|g| *g > 0)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    pub fn list(&self) -> Option<&[String]> {
        self.list.as_deref().filter(|l| !l.is_empty())
    }

    /// An answer counts as given when any field holds something.
    pub fn is_complete(&self) -> bool {
        self.gauge().is_some() || self.text().is_some() || self.list().is_some()
    }
}

/// One answer per (assessment, question).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Answer {
    pub pia_id: u64,
    pub question_id: u32,
    pub data: AnswerData,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_do_not_complete_an_answer() {
        let data = AnswerData {
            gauge: Some(0),
            text: Some(String::new()),
            list: Some(Vec::new()),
        };
        assert!(!data.is_complete());
        assert!(!AnswerData::default().is_complete());
    }

    #[test]
    fn any_field_completes_an_answer() {
        let gauge = AnswerData {
            gauge: Some(2),
            ..Default::default()
        };
        let list = AnswerData {
            list: Some(vec!["x".into()]),
            ..Default::default()
        };
        assert!(gauge.is_complete());
        assert!(list.is_complete());
    }
}
