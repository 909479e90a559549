//! Multi-ssh tmux session orchestration.
//!
//! [`MultiSshSession::open`] turns a [`SessionPlan`] into tmux commands in a
//! fixed order: create the session, rename its window, split panes, title and
//! connect every pane, then attach. The pane grid is a product of that exact
//! order, so steps are issued one at a time and never reordered. The first
//! failing command aborts the sequence.
//!
//! Teardown is explicit: call [`MultiSshSession::close`] once `open` returns,
//! whatever its outcome, or let [`MultiSshSession::run`] do both.

use crate::error::{Result, ScitsiError};
use crate::layout::{SessionPlan, MIN_HOSTS};
use crate::ssh;
use crate::tmux::{TmuxCommand, TmuxRunner, WINDOW_NAME};
use tracing::{debug, info, warn};

/// A tmux session with one ssh pane per host.
pub struct MultiSshSession<R: TmuxRunner> {
    runner: R,
    plan: SessionPlan,
    close_on_exit: bool,
    created: bool,
}

impl<R: TmuxRunner> MultiSshSession<R> {
    /// Prepare a session. Nothing runs until [`open`](Self::open).
    pub fn new(runner: R, plan: SessionPlan, close_on_exit: bool) -> Self {
        Self {
            runner,
            plan,
            close_on_exit,
            created: false,
        }
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn name(&self) -> &str {
        self.plan.name()
    }

    /// Build the session and, if `attach` is set, attach the terminal to it.
    ///
    /// Attaching blocks until the user detaches or the session ends.
    ///
    /// # Errors
    ///
    /// - [`ScitsiError::InvalidHostList`] for fewer than two hosts
    /// - [`ScitsiError::NestedSession`] when already inside tmux
    /// - [`ScitsiError::CommandExecution`] for the first failing tmux command
    pub fn open(&mut self, attach: bool) -> Result<()> {
        let hosts = self.plan.hosts().len();
        if hosts < MIN_HOSTS {
            return Err(ScitsiError::InvalidHostList(hosts));
        }
        if self.runner.inside_session() {
            return Err(ScitsiError::NestedSession);
        }

        info!(session = self.plan.name(), hosts, "creating tmux session");
        self.create_session()?;
        self.create_split_panes()?;
        self.open_ssh_connections()?;

        if attach {
            self.attach()?;
        }
        Ok(())
    }

    /// Kill the session if close-on-exit was requested and it was created.
    ///
    /// # Errors
    ///
    /// Returns [`ScitsiError::SessionTeardown`] if `kill-session` fails.
    pub fn close(mut self) -> Result<()> {
        if !self.close_on_exit || !self.created {
            return Ok(());
        }

        info!(session = self.plan.name(), "closing tmux session");
        let command = TmuxCommand::KillSession {
            session: self.plan.name().to_string(),
        };
        self.runner.run(&command).map_err(|e| match e {
            ScitsiError::CommandExecution { stderr, .. } => ScitsiError::SessionTeardown {
                session: self.plan.name().to_string(),
                stderr,
            },
            other => other,
        })
    }

    /// [`open`](Self::open) then [`close`](Self::close), reporting one error.
    ///
    /// An `open` error wins over a teardown error, which is only logged. A
    /// teardown error after a successful `open` is returned.
    ///
    /// # Errors
    ///
    /// Any error of `open`, otherwise [`ScitsiError::SessionTeardown`].
    pub fn run(mut self, attach: bool) -> Result<()> {
        let opened = self.open(attach);
        finish(opened, self.close())
    }

    fn create_session(&mut self) -> Result<()> {
        self.runner.run(&TmuxCommand::NewSession {
            name: self.plan.name().to_string(),
        })?;
        self.created = true;

        self.runner.run(&TmuxCommand::RenameWindow {
            window: 0,
            name: WINDOW_NAME.to_string(),
        })
    }

    fn create_split_panes(&mut self) -> Result<()> {
        for _ in 0..self.plan.vertical_splits() {
            self.runner.run(&TmuxCommand::SplitVertical)?;
        }

        let mut pane = 0;
        for _ in 0..self.plan.horizontal_splits() {
            self.runner.run(&TmuxCommand::SelectPane { pane })?;
            self.runner.run(&TmuxCommand::SplitHorizontal)?;
            pane += 2;
        }

        debug!(panes = self.plan.pane_count(), "pane grid created");
        Ok(())
    }

    fn open_ssh_connections(&mut self) -> Result<()> {
        for (pane, host) in self.plan.hosts().iter().enumerate() {
            self.runner.run(&TmuxCommand::SetPaneTitle {
                pane,
                title: host.clone(),
            })?;
            ssh::connect(&mut self.runner, pane, host)?;
        }
        Ok(())
    }

    fn attach(&mut self) -> Result<()> {
        self.runner.run_interactive(&TmuxCommand::AttachSession {
            session: self.plan.name().to_string(),
        })
    }
}

/// Combine the outcomes of `open` and `close`; the first error wins.
fn finish(opened: Result<()>, closed: Result<()>) -> Result<()> {
    match (opened, closed) {
        (Err(e), Err(teardown)) => {
            warn!(error = %teardown, "teardown failed after an earlier error");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), closed) => closed,
    }
}
