//! Scripted command runner for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use super::{CommandError, CommandOutput, CommandRunner, Invocation};

#[derive(Debug, Clone)]
enum Reply {
    Output(CommandOutput),
    Missing,
}

#[derive(Debug)]
struct Rule {
    program: String,
    prefix: Vec<String>,
    replies: VecDeque<Reply>,
}

impl Rule {
    fn matches(&self, invocation: &Invocation) -> bool {
        let prefix: Vec<&str> = self.prefix.iter().map(String::as_str).collect();
        self.program == invocation.program && invocation.args_start_with(&prefix)
    }

    /// Pops queued replies in order; the last one repeats forever.
    fn next_reply(&mut self) -> Reply {
        if self.replies.len() > 1 {
            self.replies.pop_front().unwrap_or(Reply::Missing)
        } else {
            self.replies.front().cloned().unwrap_or(Reply::Missing)
        }
    }
}

/// One finished call with its start and end instants.
#[derive(Debug, Clone)]
pub struct Span {
    pub invocation: Invocation,
    pub start: Instant,
    pub end: Instant,
}

impl Span {
    /// Returns true if the two calls were in flight at the same time.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Command runner that answers from a script and records every call.
///
/// Rules match on program plus an argument prefix; the longest matching
/// prefix wins. Invocations that match no rule behave like a missing binary.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    delays: Mutex<Vec<(String, Vec<String>, Duration)>>,
    calls: Mutex<Vec<Invocation>>,
    spans: Mutex<Vec<Span>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `output` for invocations of `program` whose args start with `prefix`.
    #[must_use]
    pub fn on(self, program: &str, prefix: &[&str], output: CommandOutput) -> Self {
        self.push(program, prefix, Reply::Output(output));
        self
    }

    /// Queues a successful run printing `stdout`.
    #[must_use]
    pub fn on_stdout(self, program: &str, prefix: &[&str], stdout: &str) -> Self {
        self.on(program, prefix, CommandOutput::success(stdout))
    }

    /// Makes matching invocations fail as if the binary were missing.
    #[must_use]
    pub fn missing(self, program: &str, prefix: &[&str]) -> Self {
        self.push(program, prefix, Reply::Missing);
        self
    }

    /// Makes matching invocations take `delay` before replying.
    ///
    /// The longest matching prefix wins, as for replies.
    #[must_use]
    pub fn delayed(self, program: &str, prefix: &[&str], delay: Duration) -> Self {
        self.delays.lock().unwrap().push((
            program.to_string(),
            prefix.iter().map(ToString::to_string).collect(),
            delay,
        ));
        self
    }

    fn push(&self, program: &str, prefix: &[&str], reply: Reply) {
        let mut rules = self.rules.lock().unwrap();
        if let Some(rule) = rules
            .iter_mut()
            .find(|r| r.program == program && r.prefix == prefix)
        {
            rule.replies.push_back(reply);
        } else {
            rules.push(Rule {
                program: program.to_string(),
                prefix: prefix.iter().map(ToString::to_string).collect(),
                replies: VecDeque::from([reply]),
            });
        }
    }

    /// All invocations seen so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Invocations of `program` whose args start with `prefix`.
    pub fn calls_matching(&self, program: &str, prefix: &[&str]) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == program && c.args_start_with(prefix))
            .collect()
    }

    /// Finished calls of `program` whose args start with `prefix`, by start time.
    pub fn spans_matching(&self, program: &str, prefix: &[&str]) -> Vec<Span> {
        let mut spans: Vec<Span> = self
            .spans
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.invocation.program == program && s.invocation.args_start_with(prefix))
            .cloned()
            .collect();
        spans.sort_by_key(|s| s.start);
        spans
    }

    fn delay_for(&self, invocation: &Invocation) -> Option<Duration> {
        self.delays
            .lock()
            .unwrap()
            .iter()
            .filter(|(program, prefix, _)| {
                let prefix: Vec<&str> = prefix.iter().map(String::as_str).collect();
                *program == invocation.program && invocation.args_start_with(&prefix)
            })
            .max_by_key(|(_, prefix, _)| prefix.len())
            .map(|(_, _, delay)| *delay)
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(invocation.clone());
        let start = Instant::now();
        if let Some(delay) = self.delay_for(invocation) {
            tokio::time::sleep(delay).await;
        }

        let reply = {
            let mut rules = self.rules.lock().unwrap();
            rules
                .iter_mut()
                .filter(|r| r.matches(invocation))
                .max_by_key(|r| r.prefix.len())
                .map_or(Reply::Missing, Rule::next_reply)
        };

        self.spans.lock().unwrap().push(Span {
            invocation: invocation.clone(),
            start,
            end: Instant::now(),
        });

        match reply {
            Reply::Output(output) => Ok(output),
            Reply::Missing => Err(CommandError::NotFound {
                program: invocation.program.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn netsh(args: &[&str]) -> Invocation {
        Invocation::new("netsh", Duration::from_secs(1)).args(args.iter().copied())
    }

    #[tokio::test]
    async fn longest_prefix_wins() {
        let runner = ScriptedRunner::new()
            .on_stdout("netsh", &["interface"], "short")
            .on_stdout("netsh", &["interface", "ipv4"], "long");

        let output = runner.run(&netsh(&["interface", "ipv4", "show"])).await.unwrap();
        assert_eq!(output.stdout, "long");

        let output = runner.run(&netsh(&["interface", "show"])).await.unwrap();
        assert_eq!(output.stdout, "short");
    }

    #[tokio::test]
    async fn replies_are_consumed_in_order_and_last_repeats() {
        let runner = ScriptedRunner::new()
            .on_stdout("netsh", &[], "first")
            .on_stdout("netsh", &[], "second");

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(runner.run(&netsh(&[])).await.unwrap().stdout);
        }
        assert_eq!(seen, ["first", "second", "second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_calls_record_their_span() {
        let runner = ScriptedRunner::new()
            .on_stdout("netsh", &[], "done")
            .delayed("netsh", &["interface"], Duration::from_millis(100));

        let slow_cmd = netsh(&["interface", "show"]);
        let fast_cmd = netsh(&["wlan"]);
        let (slow, fast) = tokio::join!(runner.run(&slow_cmd), runner.run(&fast_cmd));
        assert_eq!(slow.unwrap().stdout, "done");
        assert_eq!(fast.unwrap().stdout, "done");

        let slow = runner.spans_matching("netsh", &["interface"]);
        let fast = runner.spans_matching("netsh", &["wlan"]);
        assert_eq!(slow[0].end - slow[0].start, Duration::from_millis(100));
        assert_eq!(fast[0].end, fast[0].start);
        assert!(!slow[0].overlaps(&fast[0]));
    }

    #[tokio::test]
    async fn unmatched_invocation_is_not_found_and_recorded() {
        let runner = ScriptedRunner::new();
        let result = runner.run(&netsh(&["wlan"])).await;

        assert!(matches!(result, Err(CommandError::NotFound { .. })));
        assert_eq!(runner.calls_matching("netsh", &["wlan"]).len(), 1);
    }
}
