use crate::application::report::Report;
use crate::error::Result;
use std::io::Write;

/// Renders a [`Report`] as a sectioned CSV document: timestamp, balances,
/// optional vendor list, completed payments.
///
/// The sections have different column sets, so rows are written by hand with
/// [`escape_cell`] rather than through a single `csv::Writer` schema.
pub struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_report(&mut self, report: &Report) -> Result<()> {
        let w = &mut self.writer;
        writeln!(w, "Report generated: {}", report.generated.to_rfc3339())?;
        writeln!(w)?;

        writeln!(w, "Balances")?;
        writeln!(w, "Account,Balance")?;
        writeln!(w, "Account 1,{}", report.account1)?;
        writeln!(w, "Account 2,{}", report.account2)?;
        writeln!(w)?;

        if let Some(vendors) = &report.vendors {
            writeln!(w, "Vendors")?;
            writeln!(w, "Name,Payment Type,Assigned Account")?;
            for vendor in vendors {
                writeln!(
                    w,
                    "{},{},{}",
                    escape_cell(&vendor.name),
                    escape_cell(&vendor.payment_type.to_string()),
                    escape_cell(&vendor.assigned_account.to_string()),
                )?;
            }
            writeln!(w)?;
        }

        writeln!(w, "Completed Payments")?;
        writeln!(w, "Vendor Name,Amount,Date,Status,Type")?;
        if report.completed.is_empty() {
            writeln!(w, "No completed payments")?;
        } else {
            for payment in &report.completed {
                writeln!(
                    w,
                    "{},{},{},{},{}",
                    escape_cell(&payment.vendor_name),
                    escape_cell(&payment.amount.to_string()),
                    escape_cell(&payment.date.to_rfc3339()),
                    escape_cell(&payment.status.to_string()),
                    escape_cell(&payment.kind.to_string()),
                )?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Quotes a CSV cell when it contains a comma, quote or newline, doubling
/// any internal quotes.
pub fn escape_cell(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
