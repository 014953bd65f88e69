use unicode_truncate::UnicodeTruncateStr;

use super::console::Printer;
use crate::http_probe::prelude::*;
use crate::http_probe::report;

const URL_COLUMN_WIDTH: usize = 60;

fn to_fixed_width(input: &str, width: usize) -> String {
    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

/// Runs the checks once and prints each summary block.
pub struct TextPresenter<P: Printer> {
    printer: P,
}

impl<P: Printer> TextPresenter<P> {
    pub fn new(printer: P) -> Self {
        TextPresenter { printer }
    }

    /// Checks the single URL given through `TARGET_URL`.
    pub async fn run_single(&self, prober: &Prober, url: &str) -> Result<CheckResult, ProbeError> {
        self.printer
            .println(&format!("Testing URL from environment variable: {url}"));
        self.check(prober, url).await
    }

    /// Checks every default URL in order. The first failure aborts the run.
    pub async fn run_defaults(&self, prober: &Prober, urls: &[&str]) -> Result<Vec<CheckResult>, ProbeError> {
        self.printer.println("Testing both default URLs:");

        let mut results = Vec::with_capacity(urls.len());
        for (index, url) in urls.iter().enumerate() {
            self.printer
                .println(&format!("\n=== Testing URL{} ===", index + 1));
            results.push(self.check(prober, url).await?);
        }

        self.print_overview(&results);
        Ok(results)
    }

    async fn check(&self, prober: &Prober, url: &str) -> Result<CheckResult, ProbeError> {
        match prober.check(url).await {
            Ok(result) => {
                self.printer.println(result.content().trim_end());
                Ok(result)
            }
            Err(e) => {
                self.printer
                    .eprintln(&format!("❌ Probe error for {url}: {}", report(&e)));
                Err(e)
            }
        }
    }

    fn print_overview(&self, results: &[CheckResult]) {
        self.printer.println("");
        for result in results {
            let marker = if result.successful() { "✅" } else { "❌" };
            self.printer.println(&format!(
                "{marker} {} {:>5} {:>8.3}s",
                to_fixed_width(result.url(), URL_COLUMN_WIDTH),
                result.status().to_string(),
                result.response_time()
            ));
        }
    }
}
