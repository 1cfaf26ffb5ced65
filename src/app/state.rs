use time::OffsetDateTime;

use super::encoder::{EncodedImage, EncodingError};

/// Where the panel is in its edit → encode cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Phase {
    /// No text, nothing to show.
    #[default]
    Idle,
    /// Non-blank text whose encode has not been applied yet.
    Pending,
    /// The latest settled text has a result.
    Ready,
    /// The latest encode failed. Displays like `Idle` apart from any older result.
    Failed,
}

/// A single encode request. `seq` identifies the edit that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GenerationRequest {
    pub(crate) seq: u64,
    pub(crate) text: String,
}

/// The last applied QR image together with its completion timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GenerationResult {
    pub(crate) text: String,
    pub(crate) image: EncodedImage,
    pub(crate) generated_at: OffsetDateTime,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Edit {
    /// Text is identical to what the panel already holds.
    Unchanged,
    /// Text became blank; the result is gone and no encode is needed.
    Cleared,
    /// Text is non-blank and should be encoded once it settles.
    Scheduled(GenerationRequest),
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Resolution {
    Applied,
    Failed,
    /// A newer edit was issued after this request; the outcome was dropped.
    Superseded,
}

/// Transient state owned by one panel instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PanelState {
    text: String,
    result: Option<GenerationResult>,
    phase: Phase,
    latest_seq: u64,
}

impl PanelState {
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub(crate) fn edit(&mut self, text: impl Into<String>) -> Edit {
        let text = text.into();
        if text == self.text {
            return Edit::Unchanged;
        }

        self.text = text;
        self.latest_seq += 1;

        if self.text.trim().is_empty() {
            self.result = None;
            self.phase = Phase::Idle;
            return Edit::Cleared;
        }

        self.phase = Phase::Pending;
        Edit::Scheduled(GenerationRequest {
            seq: self.latest_seq,
            text: self.text.clone(),
        })
    }

    /// Apply the outcome of request `seq` if it is still the most recent one.
    ///
    /// A failure leaves any previous result in place.
    pub(crate) fn resolve(
        &mut self,
        seq: u64,
        outcome: Result<GenerationResult, EncodingError>,
    ) -> Resolution {
        if seq != self.latest_seq {
            return Resolution::Superseded;
        }

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.phase = Phase::Ready;
                Resolution::Applied
            }
            Err(_) => {
                self.phase = Phase::Failed;
                Resolution::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    fn result_for(text: &str) -> GenerationResult {
        GenerationResult {
            text: text.to_string(),
            image: EncodedImage::from_png(text.as_bytes().to_vec(), 300),
            generated_at: datetime!(2024-03-05 14:07:09 UTC),
        }
    }

    fn scheduled(edit: Edit) -> GenerationRequest {
        match edit {
            Edit::Scheduled(request) => request,
            other => panic!("expected a scheduled request, got {other:?}"),
        }
    }

    #[test]
    fn starts_idle_and_empty() {
        let state = PanelState::default();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.text(), "");
        assert!(state.result().is_none());
    }

    #[test]
    fn non_blank_edit_schedules_request_with_fresh_sequence() {
        let mut state = PanelState::default();

        let first = scheduled(state.edit("a"));
        let second = scheduled(state.edit("ab"));

        assert_eq!(first, GenerationRequest { seq: 1, text: "a".into() });
        assert_eq!(second, GenerationRequest { seq: 2, text: "ab".into() });
        assert_eq!(state.phase(), Phase::Pending);
    }

    #[test]
    fn repeating_the_same_text_is_unchanged() {
        let mut state = PanelState::default();
        scheduled(state.edit("same"));

        assert_eq!(state.edit("same"), Edit::Unchanged);
        assert_eq!(state.latest_seq(), 1);
    }

    #[test]
    fn blank_edit_clears_result_immediately() {
        let mut state = PanelState::default();
        let request = scheduled(state.edit("hello"));
        assert_eq!(state.resolve(request.seq, Ok(result_for("hello"))), Resolution::Applied);

        assert_eq!(state.edit("   "), Edit::Cleared);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.result().is_none());
        assert_eq!(state.text(), "   ");
    }

    #[test]
    fn late_result_for_older_text_is_discarded() {
        let mut state = PanelState::default();
        let a = scheduled(state.edit("A"));
        let b = scheduled(state.edit("B"));

        assert_eq!(state.resolve(b.seq, Ok(result_for("B"))), Resolution::Applied);
        assert_eq!(state.resolve(a.seq, Ok(result_for("A"))), Resolution::Superseded);

        assert_eq!(state.result().map(|r| r.text.as_str()), Some("B"));
        assert_eq!(state.phase(), Phase::Ready);
    }

    #[test]
    fn in_flight_result_is_discarded_after_clearing() {
        let mut state = PanelState::default();
        let request = scheduled(state.edit("pending"));
        state.edit("");

        assert_eq!(
            state.resolve(request.seq, Ok(result_for("pending"))),
            Resolution::Superseded
        );
        assert!(state.result().is_none());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn failure_keeps_previous_result() {
        let mut state = PanelState::default();
        let ok = scheduled(state.edit("fits"));
        state.resolve(ok.seq, Ok(result_for("fits")));

        let too_long = scheduled(state.edit("does not fit"));
        let err = EncodingError::TooLong { len: 12 };
        assert_eq!(state.resolve(too_long.seq, Err(err)), Resolution::Failed);

        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.result().map(|r| r.text.as_str()), Some("fits"));
        assert_eq!(state.text(), "does not fit");
    }

    #[test]
    fn stale_failure_is_ignored() {
        let mut state = PanelState::default();
        let old = scheduled(state.edit("old"));
        scheduled(state.edit("new"));

        assert_eq!(
            state.resolve(old.seq, Err(EncodingError::Blank)),
            Resolution::Superseded
        );
        assert_eq!(state.phase(), Phase::Pending);
    }
}
