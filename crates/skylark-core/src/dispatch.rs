use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use futures::future;
use tracing::info;

use crate::{
    domain::{Author, ChannelRef},
    parser::ParsedCommand,
    ports::{Notice, Notifier},
};

/// An asynchronous permission/eligibility predicate.
///
/// Checks must be side-effect-free or idempotent: the dispatcher runs every
/// check of a command concurrently and only consults the results in declared
/// order.
#[async_trait]
pub trait CommandCheck: Send + Sync {
    async fn passes(&self, author: &Author, channel: &ChannelRef) -> bool;
}

/// A command implementation. Runs detached: the dispatcher does not await it
/// past the checks phase, and the handler owns its error taxonomy end to end.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, parsed: ParsedCommand, channel: ChannelRef, author: Author);
}

/// One check plus the translation key posted when it fails (if any).
pub struct Check {
    pub predicate: Arc<dyn CommandCheck>,
    pub failure_key: Option<String>,
}

impl Check {
    pub fn new(predicate: Arc<dyn CommandCheck>, failure_key: Option<&str>) -> Self {
        Self {
            predicate,
            failure_key: failure_key.map(|k| k.to_string()),
        }
    }
}

/// A registered command.
pub struct CommandSpec {
    pub name: String,
    pub min_args: usize,
    pub checks: Vec<Check>,
    pub handler: Arc<dyn CommandHandler>,
}

/// Immutable command table, built once at construction and passed into the
/// dispatcher. Names are normalized to lowercase.
pub struct CommandRegistry {
    commands: HashMap<String, CommandSpec>,
}

impl CommandRegistry {
    pub fn new(specs: Vec<CommandSpec>) -> Self {
        let commands = specs
            .into_iter()
            .map(|mut spec| {
                spec.name = spec.name.to_lowercase();
                (spec.name.clone(), spec)
            })
            .collect();
        Self { commands }
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(&name.to_lowercase())
    }
}

/// Routes parsed commands to their handlers.
pub struct Dispatcher {
    registry: CommandRegistry,
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, notifier: Arc<dyn Notifier>) -> Self {
        Self { registry, notifier }
    }

    /// Dispatch one command.
    ///
    /// Unknown names are a silent no-op so ordinary channel chatter never
    /// produces errors. Too few args posts `usage-<name>`. The first failing
    /// check (in declared order) aborts the dispatch, posting its key when it
    /// has one; later checks have already run but their results are ignored.
    pub async fn dispatch(
        &self,
        name: &str,
        author: &Author,
        channel: &ChannelRef,
        parsed: ParsedCommand,
    ) {
        let Some(spec) = self.registry.get(name) else {
            return;
        };

        if parsed.args.len() < spec.min_args {
            let _ = self
                .notifier
                .notify(channel, Notice::Key(format!("usage-{}", spec.name)))
                .await;
            return;
        }

        info!(
            command = %spec.name,
            args = ?parsed.args,
            author = %author.tag,
            "executing command"
        );

        let results = future::join_all(
            spec.checks
                .iter()
                .map(|check| check.predicate.passes(author, channel)),
        )
        .await;

        for (check, passed) in spec.checks.iter().zip(results) {
            if passed {
                continue;
            }
            if let Some(key) = &check.failure_key {
                let _ = self.notifier.notify(channel, Notice::Key(key.clone())).await;
            }
            info!(
                command = %spec.name,
                reason = check.failure_key.as_deref().unwrap_or("unspecified"),
                "rejected command"
            );
            return;
        }

        let handler = Arc::clone(&spec.handler);
        let channel = channel.clone();
        let author = author.clone();
        tokio::spawn(async move {
            handler.run(parsed, channel, author).await;
        });
    }
}
