use crate::append_startup_log;

/// One discrete startup step. Steps run strictly in order; later steps may
/// assume every earlier step completed.
pub(crate) struct StartupStep<C> {
    pub(crate) name: &'static str,
    pub(crate) run: fn(&C) -> Result<(), String>,
}

/// Runs the steps in order and stops at the first failure. The caller
/// escalates the returned error; there is no partial-startup recovery.
pub(crate) fn run_startup_sequence<C>(
    context: &C,
    steps: &[StartupStep<C>],
) -> Result<(), String> {
    for step in steps {
        append_startup_log(&format!("startup step: {}", step.name));
        (step.run)(context)
            .map_err(|error| format!("startup step '{}' failed: {error}", step.name))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    type Trace = RefCell<Vec<&'static str>>;

    fn record_first(trace: &Trace) -> Result<(), String> {
        trace.borrow_mut().push("first");
        Ok(())
    }

    fn record_second(trace: &Trace) -> Result<(), String> {
        trace.borrow_mut().push("second");
        Ok(())
    }

    fn explode(_trace: &Trace) -> Result<(), String> {
        Err("boom".to_string())
    }

    #[test]
    fn steps_run_in_declaration_order() {
        let trace = Trace::default();
        let steps = [
            StartupStep { name: "first", run: record_first },
            StartupStep { name: "second", run: record_second },
        ];

        run_startup_sequence(&trace, &steps).expect("sequence should succeed");
        assert_eq!(*trace.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn the_sequence_aborts_at_the_first_failure() {
        let trace = Trace::default();
        let steps = [
            StartupStep { name: "first", run: record_first },
            StartupStep { name: "broken", run: explode },
            StartupStep { name: "second", run: record_second },
        ];

        let error = run_startup_sequence(&trace, &steps).expect_err("sequence should fail");
        assert_eq!(error, "startup step 'broken' failed: boom");
        assert_eq!(*trace.borrow(), vec!["first"]);
    }
}
