use std::io::Write;

use serde::Serialize;
use threadmark_core::dom::SnapshotView;
use threadmark_core::theme::ThemeMode;
use threadmark_core::{PresentError, Presenter, RootMessageRecord};

/// One line of presenter output
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum Output<'a> {
    Counters { roots: &'a [RootMessageRecord] },
    #[serde(rename_all = "camelCase")]
    Theme {
        mode: ThemeMode,
        body_class: Option<&'static str>,
    },
}

/// Writes counters as JSON lines and marks them painted in the snapshot.
pub struct JsonPresenter<'a, W: Write> {
    view: &'a SnapshotView,
    out: W,
    pretty: bool,
}

impl<'a, W: Write> JsonPresenter<'a, W> {
    pub fn new(view: &'a SnapshotView, out: W, pretty: bool) -> Self {
        Self { view, out, pretty }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, output: &Output<'_>) -> Result<(), PresentError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, output)?;
        } else {
            serde_json::to_writer(&mut self.out, output)?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Presenter for JsonPresenter<'_, W> {
    fn render(&mut self, records: &[RootMessageRecord]) -> Result<(), PresentError> {
        for record in records {
            // Roots scrolled out of the page have nowhere to carry a counter
            if self.view.contains_message(record.presentation_handle.node_id()) {
                self.view.mark_painted(&record.id);
            }
        }
        self.emit(&Output::Counters { roots: records })
    }

    fn apply_theme(&mut self, mode: ThemeMode) -> Result<(), PresentError> {
        self.emit(&Output::Theme {
            mode,
            body_class: mode.body_class(),
        })
    }
}
