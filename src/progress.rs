/// One-way channel for human-readable status lines.
///
/// Frontends implement this to surface progress to the operator; the pipeline
/// never waits for an acknowledgment.
pub trait ProgressSink {
    fn emit(&mut self, message: &str);
}

/// Drops every message
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&mut self, _message: &str) {}
}

/// Forwards messages to the `log` facade at info level
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&mut self, message: &str) {
        ::log::info!("{}", message);
    }
}

impl<F: FnMut(&str)> ProgressSink for F {
    fn emit(&mut self, message: &str) {
        self(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_act_as_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |m: &str| seen.push(m.to_string());
            let sink: &mut dyn ProgressSink = &mut sink;
            sink.emit("first");
            sink.emit("second");
        }
        assert_eq!(seen, vec!["first", "second"]);
    }
}
