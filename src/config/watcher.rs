//! Settings file watcher for hot reload.
//!
//! Watches the directory holding the settings file so editors that save by
//! rename are still seen. Only events touching the file itself trigger a
//! reload; settings that fail to load or validate are logged and dropped.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_settings;
use crate::config::schema::Settings;

/// Watches one settings file and forwards every valid reload.
pub struct ConfigWatcher {
    path: PathBuf,
    updates: mpsc::UnboundedSender<Settings>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end for reloaded settings.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Settings>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            updates,
        };
        (watcher, rx)
    }

    /// Start watching. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let path = self.path.clone();
        let updates = self.updates;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_reload(&event, &path) => reload(&path, &updates),
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Settings watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Settings watcher started");
        Ok(watcher)
    }
}

fn is_reload(event: &Event, path: &Path) -> bool {
    let relevant = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == path.file_name())
}

fn reload(path: &Path, updates: &mpsc::UnboundedSender<Settings>) {
    match load_settings(path) {
        Ok(settings) => {
            tracing::info!(path = %path.display(), "Settings reloaded");
            if updates.send(settings).is_err() {
                tracing::debug!("Settings receiver dropped, reload discarded");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Settings reload rejected, keeping current configuration");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    #[test]
    fn test_reload_only_for_watched_file() {
        let path = Path::new("/etc/hashroute/settings.toml");

        let modify = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/etc/hashroute/settings.toml"));
        assert!(is_reload(&modify, path));

        let create = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/etc/hashroute/settings.toml"));
        assert!(is_reload(&create, path));

        let other = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/etc/hashroute/routes.bak"));
        assert!(!is_reload(&other, path));

        let removed = Event::new(EventKind::Remove(notify::event::RemoveKind::File))
            .add_path(PathBuf::from("/etc/hashroute/settings.toml"));
        assert!(!is_reload(&removed, path));
    }
}
