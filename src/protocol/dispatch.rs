//! Applying server actions to the host document

use crate::protocol::action::{Action, TableType, TextRange};

/// Whether the server has more actions queued for this request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// All actions applied; the request is finished
    Complete,
    /// A long-running action is in progress; post the request again
    AwaitingMore,
}

/// Host-side effects for each action kind
///
/// The host editor implements this; only the text actions are required.
/// Everything else defaults to doing nothing.
pub trait ActionHandler {
    type Error;

    fn highlight_text(&mut self, range: TextRange) -> Result<(), Self::Error>;

    fn link_text(&mut self, range: TextRange, url: &str) -> Result<(), Self::Error>;

    fn show_sidebar(&mut self, _html: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn show_progress_bar(&mut self, html: &str) -> Result<(), Self::Error> {
        self.show_sidebar(html)?;
        self.update_progress("0")
    }

    fn update_progress(&mut self, _progress: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn show_modal_dialog(
        &mut self,
        _html: &str,
        _title: &str,
        _width: u32,
        _height: u32,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn add_table(
        &mut self,
        _child_index: usize,
        _data: &[Vec<String>],
        _col_sizes: &[u32],
        _table_type: Option<TableType>,
        _lab_data: Option<&[Vec<String>]>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn calculate_samples(
        &mut self,
        _table_ids: &[usize],
        _sample_indices: &[i64],
        _sample_values: &[Vec<String>],
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn update_experiment_results(
        &mut self,
        _header_idx: i64,
        _content_idx: i64,
        _data: &[Vec<String>],
        _links: &[Vec<String>],
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn report_content(&mut self, _report: &serde_json::Value) -> Result<(), Self::Error> {
        Ok(())
    }

    fn unknown(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Apply `actions` in order
///
/// Stops at the first handler error. Returns [`DispatchOutcome::AwaitingMore`]
/// when any action was a progress report.
pub fn dispatch<H: ActionHandler + ?Sized>(
    actions: &[Action],
    handler: &mut H,
) -> Result<DispatchOutcome, H::Error> {
    let mut outcome = DispatchOutcome::Complete;

    for action in actions {
        if action.expects_more() {
            outcome = DispatchOutcome::AwaitingMore;
        }

        match action {
            Action::HighlightText {
                paragraph_index,
                offset,
                end_offset,
            } => handler.highlight_text(TextRange::new(*paragraph_index, *offset, *end_offset))?,
            Action::LinkText {
                paragraph_index,
                offset,
                end_offset,
                url,
            } => handler.link_text(TextRange::new(*paragraph_index, *offset, *end_offset), url)?,
            Action::ShowSidebar { html } => handler.show_sidebar(html)?,
            Action::ShowProgressbar { html } => handler.show_progress_bar(html)?,
            Action::UpdateProgress { progress } => handler.update_progress(progress)?,
            Action::ShowModalDialog {
                html,
                title,
                width,
                height,
            } => handler.show_modal_dialog(html, title, *width, *height)?,
            Action::AddTable {
                cursor_child_index,
                table_data,
                col_sizes,
                table_type,
                table_lab,
            } => handler.add_table(
                *cursor_child_index,
                table_data,
                col_sizes,
                *table_type,
                table_lab.as_deref(),
            )?,
            Action::CalculateSamples {
                table_ids,
                sample_indices,
                sample_values,
            } => handler.calculate_samples(table_ids, sample_indices, sample_values)?,
            Action::UpdateExperimentResults {
                header_idx,
                content_idx,
                exp_data,
                exp_links,
            } => {
                handler.update_experiment_results(*header_idx, *content_idx, exp_data, exp_links)?
            }
            Action::ReportContent { report } => handler.report_content(report)?,
            Action::Unknown => {
                tracing::debug!("skipping unknown action");
                handler.unknown()?
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
        fail_on_link: bool,
    }

    impl ActionHandler for Recorder {
        type Error = String;

        fn highlight_text(&mut self, range: TextRange) -> Result<(), String> {
            self.log.push(format!(
                "highlight {}:{}-{}",
                range.paragraph_index, range.offset, range.end_offset
            ));
            Ok(())
        }

        fn link_text(&mut self, range: TextRange, url: &str) -> Result<(), String> {
            if self.fail_on_link {
                return Err(format!("cannot link {url}"));
            }
            self.log.push(format!("link {} {url}", range.paragraph_index));
            Ok(())
        }

        fn show_sidebar(&mut self, html: &str) -> Result<(), String> {
            self.log.push(format!("sidebar {html}"));
            Ok(())
        }

        fn update_progress(&mut self, progress: &str) -> Result<(), String> {
            self.log.push(format!("progress {progress}"));
            Ok(())
        }

        fn unknown(&mut self) -> Result<(), String> {
            self.log.push("unknown".to_string());
            Ok(())
        }
    }

    fn highlight(paragraph_index: usize, offset: usize, end_offset: usize) -> Action {
        Action::HighlightText {
            paragraph_index,
            offset,
            end_offset,
        }
    }

    #[test]
    fn test_dispatch_in_order() {
        let actions = vec![
            highlight(2, 0, 4),
            Action::ShowSidebar { html: "<p/>".to_string() },
            Action::Unknown,
        ];
        let mut recorder = Recorder::default();

        let outcome = dispatch(&actions, &mut recorder).unwrap();
        assert_eq!(outcome, DispatchOutcome::Complete);
        assert_eq!(recorder.log, vec!["highlight 2:0-4", "sidebar <p/>", "unknown"]);
    }

    #[test]
    fn test_progress_keeps_polling() {
        let actions = vec![Action::ShowProgressbar { html: "bar".to_string() }];
        let mut recorder = Recorder::default();

        let outcome = dispatch(&actions, &mut recorder).unwrap();
        assert_eq!(outcome, DispatchOutcome::AwaitingMore);
        assert_eq!(recorder.log, vec!["sidebar bar", "progress 0"]);

        let actions = vec![Action::UpdateProgress { progress: "55".to_string() }];
        assert_eq!(dispatch(&actions, &mut recorder).unwrap(), DispatchOutcome::AwaitingMore);
    }

    #[test]
    fn test_empty_is_complete() {
        let mut recorder = Recorder::default();
        assert_eq!(dispatch(&[], &mut recorder).unwrap(), DispatchOutcome::Complete);
        assert!(recorder.log.is_empty());
    }

    #[test]
    fn test_handler_error_stops_dispatch() {
        let actions = vec![
            Action::LinkText {
                paragraph_index: 0,
                offset: 0,
                end_offset: 3,
                url: "https://example.org".to_string(),
            },
            highlight(1, 0, 1),
        ];
        let mut recorder = Recorder {
            fail_on_link: true,
            ..Default::default()
        };

        let err = dispatch(&actions, &mut recorder).unwrap_err();
        assert_eq!(err, "cannot link https://example.org");
        assert!(recorder.log.is_empty());
    }

    #[test]
    fn test_text_range_addresses() {
        let range = highlight(3, 5, 9).text_range().unwrap();
        assert_eq!(range.start(), Address::new(3, 5));
        assert_eq!(range.end(), Address::new(3, 9));
    }
}
