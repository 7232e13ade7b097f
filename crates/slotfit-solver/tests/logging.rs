// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use slotfit_fit::exhaustive::ExhaustiveSearch;
use slotfit_model::problem::Problem;
use slotfit_solver::{config::SchedulerConfig, scheduler::SchedulerBuilder};
use std::{
    io::Write,
    sync::{Arc, Mutex},
    time::Duration,
};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

fn capture<F>(f: F) -> String
where
    F: FnOnce(),
{
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    buffer.contents()
}

#[test]
fn test_log_monitor_reports_start_progress_and_finish() {
    let problem = Problem::new(&[10, 10, 10, 10], &[], 0, 29).unwrap();
    let output = capture(|| {
        let mut scheduler = SchedulerBuilder::new()
            .with_strategy(ExhaustiveSearch::new())
            .with_log_interval(Duration::ZERO)
            .build();
        scheduler.schedule(&problem).unwrap();
    });

    assert!(output.contains("search started"), "{output}");
    assert!(output.contains("search finished"), "{output}");
    assert!(output.contains("exhaustive search finished"), "{output}");
}

#[test]
fn test_abandoned_search_logs_warning() {
    let problem = Problem::new(&[10, 10, 10], &[], 0, 9).unwrap();
    let output = capture(|| {
        let mut scheduler = SchedulerBuilder::new().with_step_limit(1).build();
        let outcome = scheduler.schedule(&problem).unwrap();
        assert!(outcome.is_aborted());
    });

    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("step budget exhausted"), "{output}");
}

#[test]
fn test_parallel_search_logs_progress_from_calling_thread() {
    let config = SchedulerConfig::from_toml_str(
        r#"
        strategy = "parallel_exhaustive"
        time_limit_ms = 300
        log_interval_ms = 1
        threads = 2
        "#,
    )
    .unwrap();
    // 30 unit tasks in 29 slots keep the workers busy until the deadline.
    let problem = Problem::new(&[1; 30], &[], 0, 28).unwrap();
    let output = capture(|| {
        let mut scheduler = SchedulerBuilder::from_config(&config).unwrap().build();
        let outcome = scheduler.schedule(&problem).unwrap();
        assert!(outcome.is_aborted());
    });

    assert!(output.contains("search progress"), "{output}");
    let finished = output
        .lines()
        .find(|line| line.contains("search finished"))
        .unwrap_or_else(|| panic!("no finish line in {output}"));
    assert!(!finished.contains("steps=0 "), "{finished}");
}
