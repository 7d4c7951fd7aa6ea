// ABOUTME: Emits a debug-level tracing event with the elapsed time of every wrapped call.
// ABOUTME: Opt-in; not part of the default plugin list.

use std::time::Instant;

use crate::extractors::operation::Operation;
use crate::plugins::{handler, Handler, Plugin, Scope};

pub struct TracingPlugin {
    scope: Scope,
}

impl TracingPlugin {
    pub fn with_scope(scope: Scope) -> Self {
        Self { scope }
    }
}

impl Default for TracingPlugin {
    fn default() -> Self {
        Self::with_scope(Scope::all())
    }
}

impl Plugin for TracingPlugin {
    fn name(&self) -> &str {
        "tracing"
    }

    fn should_run(&self, host: &str, op: Operation) -> bool {
        self.scope.matches(host, op)
    }

    fn wrap(&self, op: Operation, next: Handler) -> Handler {
        handler(move |ctx| {
            let started = Instant::now();
            let result = next(ctx);
            tracing::debug!(
                host = ctx.host(),
                op = %op,
                elapsed_us = started.elapsed().as_micros() as u64,
                ok = result.is_ok(),
                "operation finished"
            );
            result
        })
    }
}
