//! Attendance page, visited twice: once filtered to theory records and once
//! to practical records. The theory pass waits in the session's temporary
//! buffer across the reload in between.

use crate::automaton::{Automaton, Step};
use crate::dom::{SelectControl, Snapshot};
use crate::page::{Ack, Command, Locator};
use crate::portal::{ids, PRACTICAL_OPTION, THEORY_OPTION};
use crate::session::{AttendancePass, SessionState};
use crate::table::{group_by_subject, parse_percentage};
use crate::timers::{settle, wait_until};
use crate::types::{AttendanceReport, ExtractedRecord, SyncError, SyncResult};

/// What the attendance page currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceView {
    /// No record-type dropdown on the page.
    FilterMissing,
    /// No filter applied yet; `theory` is the option to pick, if offered.
    Unfiltered { theory: Option<usize> },
    /// Theory records shown; `practical` is the next option, if offered.
    Theory {
        pass: AttendancePass,
        practical: Option<usize>,
    },
    Practical { pass: AttendancePass },
}

fn bare(value: &str) -> &str {
    value.trim().trim_matches('\'')
}

/// Option index for a filter value, ignoring the portal's quoting.
fn filter_option(control: &SelectControl, wanted: &str) -> Option<usize> {
    control.position(wanted).or_else(|| {
        control
            .options
            .iter()
            .position(|opt| bare(opt) == bare(wanted))
    })
}

fn scrape_pass(snap: &Snapshot) -> AttendancePass {
    AttendancePass {
        rows: snap
            .table(ids::RESULTS_TABLE)
            .map(|table| group_by_subject(&table))
            .unwrap_or_default(),
        percent: parse_percentage(snap.text_opt(ids::PERCENTAGE).as_deref()),
    }
}

pub fn read_view(html: &str) -> AttendanceView {
    let snap = Snapshot::parse(html);
    let Some(control) = snap.select(&Locator::id(ids::RECORD_TYPE)) else {
        return AttendanceView::FilterMissing;
    };

    match control.value().map(bare) {
        Some(active) if active == bare(THEORY_OPTION) => AttendanceView::Theory {
            pass: scrape_pass(&snap),
            practical: filter_option(&control, PRACTICAL_OPTION),
        },
        Some(active) if active == bare(PRACTICAL_OPTION) => AttendanceView::Practical {
            pass: scrape_pass(&snap),
        },
        _ => AttendanceView::Unfiltered {
            theory: filter_option(&control, THEORY_OPTION),
        },
    }
}

/// Combine both passes into the record the host stores.
pub fn merge(theory: AttendancePass, practical: AttendancePass) -> AttendanceReport {
    AttendanceReport {
        theory_percent: theory.percent,
        practical_percent: practical.percent,
        theory_rows: theory.rows,
        practical_rows: practical.rows,
    }
}

impl Automaton<'_> {
    pub(crate) async fn handle_attendance(&mut self, state: &mut SessionState) -> SyncResult<Step> {
        let config = self.config;
        let filter = Locator::id(ids::RECORD_TYPE);

        let Some(html) =
            wait_until(&*self.page, &config.timings, |snap| snap.select(&filter).is_some())
                .await?
        else {
            return Ok(self.fail(SyncError::FilterControlMissing));
        };

        match read_view(&html) {
            AttendanceView::FilterMissing | AttendanceView::Unfiltered { theory: None } => {
                Ok(self.fail(SyncError::FilterControlMissing))
            }
            AttendanceView::Unfiltered {
                theory: Some(option),
            } => {
                self.bridge.log("Selecting theory records...");
                self.apply_filter(option).await
            }
            AttendanceView::Theory {
                pass,
                practical: Some(option),
            } => {
                self.bridge.log("Extracting theory attendance...");
                state.temporary_buffer = Some(pass);
                self.apply_filter(option).await
            }
            AttendanceView::Theory {
                pass,
                practical: None,
            } => {
                tracing::info!("no practical records offered");
                state.temporary_buffer = None;
                self.finish_attendance(merge(pass, AttendancePass::default()))
                    .await
            }
            AttendanceView::Practical { pass } => {
                self.bridge.log("Extracting practical attendance...");
                // Landing here without a theory pass reports empty theory data.
                let theory = state.temporary_buffer.take().unwrap_or_default();
                self.finish_attendance(merge(theory, pass)).await
            }
        }
    }

    /// Pick a record type and resubmit the form.
    async fn apply_filter(&mut self, option: usize) -> SyncResult<Step> {
        self.command(Command::Select {
            target: Locator::id(ids::RECORD_TYPE),
            index: option,
        })
        .await?;
        settle(self.config.timings.filter_settle()).await;

        let ack = self
            .command(Command::Click {
                target: Locator::id(ids::SUBMIT),
            })
            .await?;
        if ack == Ack::NotFound {
            return Ok(self.fail(SyncError::FilterControlMissing));
        }
        Ok(Step::Continue)
    }

    async fn finish_attendance(&mut self, report: AttendanceReport) -> SyncResult<Step> {
        self.bridge.record(ExtractedRecord::Attendance(report));
        settle(self.config.timings.page_settle()).await;
        self.navigate(self.config.portal.faculty_url()).await?;
        Ok(Step::Continue)
    }
}
