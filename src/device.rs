//! Device repository: the façade over bridge + parsers + categorizer
//!
//! Every operation re-queries the live device; there is no cache of device
//! state between calls. External-process failures are converted to the typed
//! domain errors here; nothing below the CLI sees a raw OS error.

use crate::bridge::Bridge;
use crate::error::{Error, Result};
use crate::model::{
    CallLogEntry, Category, DeviceHandle, DeviceProperties, DirectoryListing, FileEntry,
    MessageEntry, SystemInfo, UNKNOWN,
};
use crate::parser::records::{battery_health_label, battery_status_label, colon_field};
use crate::parser::{parse_call_log, parse_recursive_listing, parse_sms_log, Listing};
use chrono::{DateTime, Local, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const CALL_LOG_URI: &str = "content://call_log/calls";
const SMS_URI: &str = "content://sms";

/// Outcome of a batch pull; the batch as a whole fails only when every
/// constituent pull failed
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub downloaded: Vec<PathBuf>,
    pub failures: Vec<(String, String)>,
}

/// Trim trailing separators so the path interpolates cleanly into headers
/// and argument lists; a bare `/` stays `/`.
fn normalize_dir(directory: &str) -> String {
    let trimmed = directory.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Repository over one attached device
pub struct DeviceRepo {
    bridge: Bridge,
}

impl DeviceRepo {
    pub fn new(bridge: Bridge) -> Self {
        Self { bridge }
    }

    /// Point-in-time snapshot of connected devices; zero devices is a valid,
    /// non-error result
    pub async fn list_devices(&self) -> Result<Vec<DeviceHandle>> {
        let out = self.bridge.run(&["devices"]).await?;
        if !out.success() {
            return Err(Error::ExternalTool(out.diagnostic()));
        }
        Ok(out
            .stdout
            .lines()
            .skip(1)
            .filter_map(|line| {
                let mut parts = line.split('\t');
                match (parts.next(), parts.next()) {
                    (Some(serial), Some(state)) if state.trim() == "device" => {
                        Some(DeviceHandle {
                            serial: serial.trim().to_string(),
                        })
                    }
                    _ => None,
                }
            })
            .collect())
    }

    /// List files under a directory, categorized, with download references
    ///
    /// An empty result means the directory is empty or unreachable; a listing
    /// the device refused outright surfaces as `ExternalTool`.
    pub async fn list_files(&self, directory: &str, recursive: bool) -> Result<DirectoryListing> {
        let dir = normalize_dir(directory);
        let out = if recursive {
            self.bridge.run(&["shell", "ls", "-R", &dir]).await?
        } else {
            self.bridge.run(&["shell", "ls", &dir]).await?
        };
        if !out.success() && out.stdout.trim().is_empty() {
            return Err(Error::ExternalTool(format!(
                "listing '{}' failed: {}",
                dir,
                out.diagnostic()
            )));
        }

        let entries = match parse_recursive_listing(&dir, &out.stdout) {
            Listing::Empty => Vec::new(),
            Listing::Entries(listed) => listed
                .into_iter()
                .map(|f| {
                    let category = Category::from_path(&f.path);
                    let download_ref =
                        format!("/files/download?path={}", urlencoding::encode(&f.path));
                    FileEntry {
                        name: f.name,
                        path: f.path,
                        category,
                        download_ref,
                        modified: None,
                    }
                })
                .collect(),
        };

        Ok(DirectoryListing { root: dir, entries })
    }

    /// Fill in modification times for a set of entries, one `stat` per file
    ///
    /// `ls -R` output carries no timestamps, so listings start with
    /// `modified: None`; callers that filter by date call this on the entries
    /// they are about to inspect. An entry the device cannot stat keeps
    /// `None` and a warning is logged.
    pub async fn populate_modified(&self, entries: &mut [FileEntry]) {
        for entry in entries.iter_mut() {
            entry.modified = self.stat_modified(&entry.path).await;
        }
    }

    async fn stat_modified(&self, path: &str) -> Option<DateTime<Local>> {
        let out = match self.bridge.run(&["shell", "stat", "-c", "%Y", path]).await {
            Ok(out) if out.success() => out,
            Ok(out) => {
                warn!(path, "stat failed: {}", out.diagnostic());
                return None;
            }
            Err(e) => {
                warn!(path, error = %e, "stat failed");
                return None;
            }
        };
        let secs = match out.stdout.trim().parse::<i64>() {
            Ok(secs) => secs,
            Err(_) => {
                warn!(path, raw = %out.stdout.trim(), "unparseable stat timestamp");
                return None;
            }
        };
        Local.timestamp_opt(secs, 0).single()
    }

    /// Pull one remote file into `out_dir`, returning the local path
    ///
    /// The local name is the remote's final path segment only; a remote whose
    /// basename is a traversal segment is rejected before anything runs, so
    /// the derived path can never escape `out_dir`.
    pub async fn download_file(&self, remote: &str, out_dir: &Path) -> Result<PathBuf> {
        let base = remote
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Download {
                remote: remote.to_string(),
                detail: "remote path has no file name".to_string(),
            })?;
        if base == "." || base == ".." || base.contains('\\') {
            return Err(Error::Download {
                remote: remote.to_string(),
                detail: format!("refusing unsafe local name '{}'", base),
            });
        }

        fs::create_dir_all(out_dir)?;
        let local = out_dir.join(base);
        let local_arg = local.to_string_lossy().into_owned();

        let out = self.bridge.run(&["pull", remote, &local_arg]).await?;
        if !out.success() {
            return Err(Error::Download {
                remote: remote.to_string(),
                detail: out.diagnostic(),
            });
        }
        Ok(local)
    }

    /// Pull a set of remote files; per-file failures are collected, and the
    /// batch errors only if nothing succeeded
    pub async fn download_many(&self, remotes: &[String], out_dir: &Path) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        for remote in remotes {
            match self.download_file(remote, out_dir).await {
                Ok(path) => outcome.downloaded.push(path),
                Err(e) => {
                    warn!(remote, error = %e, "pull failed");
                    outcome.failures.push((remote.clone(), e.to_string()));
                }
            }
        }
        if outcome.downloaded.is_empty() && !remotes.is_empty() {
            return Err(Error::Download {
                remote: format!("{} files", remotes.len()),
                detail: "every pull in the batch failed".to_string(),
            });
        }
        Ok(outcome)
    }

    /// Fixed property set over `getprop`; a failed query degrades that single
    /// field to `unknown`
    pub async fn get_properties(&self) -> Result<DeviceProperties> {
        Ok(DeviceProperties {
            model: self.prop("ro.product.model").await?,
            manufacturer: self.prop("ro.product.manufacturer").await?,
            android_version: self.prop("ro.build.version.release").await?,
            sdk: self.prop("ro.build.version.sdk").await?,
            serial: self.prop("ro.serialno").await?,
        })
    }

    async fn prop(&self, key: &str) -> Result<String> {
        let out = self.bridge.run(&["shell", "getprop", key]).await?;
        if !out.success() {
            warn!(key, "property query failed: {}", out.diagnostic());
            return Ok(UNKNOWN.to_string());
        }
        let value = out.stdout.trim();
        Ok(if value.is_empty() {
            UNKNOWN.to_string()
        } else {
            value.to_string()
        })
    }

    /// Battery and uptime snapshot; individual missing fields degrade to
    /// `unknown` without failing the call
    pub async fn get_system_info(&self) -> Result<SystemInfo> {
        let battery = self.bridge.run(&["shell", "dumpsys", "battery"]).await?;
        if !battery.success() {
            return Err(Error::ExternalTool(format!(
                "dumpsys battery failed: {}",
                battery.diagnostic()
            )));
        }
        let level = colon_field(&battery.stdout, "level");
        let status = colon_field(&battery.stdout, "status");
        let health = colon_field(&battery.stdout, "health");

        let uptime = match self.bridge.run(&["shell", "uptime"]).await {
            Ok(out) if out.success() => {
                let v = out.stdout.trim().to_string();
                if v.is_empty() {
                    UNKNOWN.to_string()
                } else {
                    v
                }
            }
            _ => UNKNOWN.to_string(),
        };

        Ok(SystemInfo {
            battery_level: level.unwrap_or_else(|| UNKNOWN.to_string()),
            battery_status: status
                .map(|c| battery_status_label(&c).to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            battery_health: health
                .map(|c| battery_health_label(&c).to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            uptime,
        })
    }

    /// Call log over the content provider
    pub async fn get_call_log(&self) -> Result<Vec<CallLogEntry>> {
        let out = self
            .bridge
            .run(&["shell", "content", "query", "--uri", CALL_LOG_URI])
            .await?;
        if !out.success() {
            return Err(Error::ExternalTool(format!(
                "call log query failed: {}",
                out.diagnostic()
            )));
        }
        Ok(parse_call_log(&out.stdout))
    }

    /// SMS log over the content provider
    pub async fn get_sms_log(&self) -> Result<Vec<MessageEntry>> {
        let out = self
            .bridge
            .run(&["shell", "content", "query", "--uri", SMS_URI])
            .await?;
        if !out.success() {
            return Err(Error::ExternalTool(format!(
                "sms query failed: {}",
                out.diagnostic()
            )));
        }
        Ok(parse_sms_log(&out.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_normalization() {
        assert_eq!(normalize_dir("/sdcard/"), "/sdcard");
        assert_eq!(normalize_dir("/sdcard"), "/sdcard");
        assert_eq!(normalize_dir("/sdcard/DCIM///"), "/sdcard/DCIM");
        assert_eq!(normalize_dir("/"), "/");
    }

    #[cfg(unix)]
    mod with_fake_bridge {
        use super::super::*;
        use crate::config::Config;
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Fake bridge covering the command set the repo issues
        const SCRIPT: &str = r#"#!/bin/sh
case "$1" in
  devices)
    printf 'List of devices attached\nemulator-5554\tdevice\ndead-beef\toffline\n'
    ;;
  pull)
    printf 'pulled' > "$3"
    ;;
  shell)
    shift
    case "$*" in
      "ls -R /sdcard")
        printf '/sdcard:\nDCIM\nnotes.txt\n\n/sdcard/DCIM:\nphoto.jpg\nclip.mp4\n'
        ;;
      "ls -R /nowhere")
        echo "ls: /nowhere: No such file or directory" >&2
        exit 1
        ;;
      "getprop ro.product.model")
        echo "Pixel 4"
        ;;
      getprop*)
        echo ""
        ;;
      "stat -c %Y /sdcard/DCIM/photo.jpg")
        echo 1700000000
        ;;
      "stat -c %Y "*)
        echo "stat: No such file or directory" >&2
        exit 1
        ;;
      "dumpsys battery")
        printf 'Current Battery Service state:\n  level: 87\n  status: 2\n  health: 2\n'
        ;;
      uptime)
        echo " 10:00:00 up 1 day, load average: 0.1"
        ;;
      "content query --uri content://call_log/calls")
        printf 'Row: 0 _id=1, number=12345, date=1700000000000, duration=30, type=1, name=NULL\n'
        ;;
      "content query --uri content://sms")
        printf 'Row: 0 address=555, date=bogus, type=2, body=hello\n'
        ;;
      *)
        exit 1
        ;;
    esac
    ;;
  *)
    exit 1
    ;;
esac
"#;

        fn fake_repo(dir: &TempDir) -> DeviceRepo {
            let script = dir.path().join("fake-adb");
            let mut f = std::fs::File::create(&script).unwrap();
            f.write_all(SCRIPT.as_bytes()).unwrap();
            drop(f);
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
            let config = Config {
                bridge: script.to_string_lossy().into_owned(),
                ..Config::default()
            };
            DeviceRepo::new(Bridge::new(&config).unwrap())
        }

        #[tokio::test]
        async fn only_ready_devices_are_listed() {
            let dir = TempDir::new().unwrap();
            let repo = fake_repo(&dir);
            let devices = repo.list_devices().await.unwrap();
            assert_eq!(devices.len(), 1);
            assert_eq!(devices[0].serial, "emulator-5554");
        }

        #[tokio::test]
        async fn listing_is_categorized_and_idempotent() {
            let dir = TempDir::new().unwrap();
            let repo = fake_repo(&dir);

            let first = repo.list_files("/sdcard/", true).await.unwrap();
            assert_eq!(first.root, "/sdcard");
            assert_eq!(first.entries.len(), 4);
            let photo = first
                .entries
                .iter()
                .find(|e| e.name == "photo.jpg")
                .unwrap();
            assert_eq!(photo.path, "/sdcard/DCIM/photo.jpg");
            assert_eq!(photo.category, Category::Image);
            assert!(photo.download_ref.contains("path=%2Fsdcard%2FDCIM%2Fphoto.jpg"));

            let count = |listing: &DirectoryListing, cat: Category| {
                listing.entries.iter().filter(|e| e.category == cat).count()
            };
            let second = repo.list_files("/sdcard/", true).await.unwrap();
            for cat in [
                Category::Image,
                Category::Video,
                Category::Document,
                Category::Other,
            ] {
                assert_eq!(count(&first, cat), count(&second, cat));
            }
        }

        #[tokio::test]
        async fn modification_times_fill_in_per_file() {
            let dir = TempDir::new().unwrap();
            let repo = fake_repo(&dir);

            let mut listing = repo.list_files("/sdcard", true).await.unwrap();
            assert!(listing.entries.iter().all(|e| e.modified.is_none()));

            repo.populate_modified(&mut listing.entries).await;
            let photo = listing
                .entries
                .iter()
                .find(|e| e.name == "photo.jpg")
                .unwrap();
            let modified = photo.modified.expect("stat answered for photo.jpg");
            assert_eq!(modified.timestamp(), 1_700_000_000);

            // files the device cannot stat stay undated
            let notes = listing
                .entries
                .iter()
                .find(|e| e.name == "notes.txt")
                .unwrap();
            assert!(notes.modified.is_none());
        }

        #[tokio::test]
        async fn unreachable_directory_is_an_external_tool_error() {
            let dir = TempDir::new().unwrap();
            let repo = fake_repo(&dir);
            let err = repo.list_files("/nowhere", true).await.expect_err("fail");
            assert!(matches!(err, Error::ExternalTool(_)));
        }

        #[tokio::test]
        async fn download_uses_the_basename_only() {
            let dir = TempDir::new().unwrap();
            let repo = fake_repo(&dir);
            let out_dir = dir.path().join("downloads");
            let local = repo
                .download_file("/sdcard/DCIM/photo.jpg", &out_dir)
                .await
                .unwrap();
            assert_eq!(local, out_dir.join("photo.jpg"));
            assert!(local.exists());
        }

        #[tokio::test]
        async fn traversal_remote_is_rejected_before_running() {
            let dir = TempDir::new().unwrap();
            let repo = fake_repo(&dir);
            let out_dir = dir.path().join("downloads");
            let err = repo
                .download_file("/sdcard/..", &out_dir)
                .await
                .expect_err("must reject");
            assert!(matches!(err, Error::Download { .. }));
            // nothing may have been written outside the output directory
            assert!(!dir.path().join("downloads").join("..").is_file());
        }

        #[tokio::test]
        async fn batch_collects_failures_but_succeeds_with_one_good_pull() {
            let dir = TempDir::new().unwrap();
            let repo = fake_repo(&dir);
            let out_dir = dir.path().join("downloads");
            let remotes = vec![
                "/sdcard/DCIM/photo.jpg".to_string(),
                "/sdcard/..".to_string(),
            ];
            let outcome = repo.download_many(&remotes, &out_dir).await.unwrap();
            assert_eq!(outcome.downloaded.len(), 1);
            assert_eq!(outcome.failures.len(), 1);
        }

        #[tokio::test]
        async fn batch_of_only_failures_fails_as_a_whole() {
            let dir = TempDir::new().unwrap();
            let repo = fake_repo(&dir);
            let out_dir = dir.path().join("downloads");
            let remotes = vec!["/sdcard/..".to_string()];
            let err = repo
                .download_many(&remotes, &out_dir)
                .await
                .expect_err("all failed");
            assert!(matches!(err, Error::Download { .. }));
        }

        #[tokio::test]
        async fn properties_degrade_per_field() {
            let dir = TempDir::new().unwrap();
            let repo = fake_repo(&dir);
            let props = repo.get_properties().await.unwrap();
            assert_eq!(props.model, "Pixel 4");
            assert_eq!(props.manufacturer, UNKNOWN);
            assert_eq!(props.sdk, UNKNOWN);
        }

        #[tokio::test]
        async fn system_info_maps_battery_codes() {
            let dir = TempDir::new().unwrap();
            let repo = fake_repo(&dir);
            let info = repo.get_system_info().await.unwrap();
            assert_eq!(info.battery_level, "87");
            assert_eq!(info.battery_status, "Charging");
            assert_eq!(info.battery_health, "Good");
            assert!(info.uptime.contains("up 1 day"));
        }

        #[tokio::test]
        async fn logs_decode_with_degraded_fields() {
            let dir = TempDir::new().unwrap();
            let repo = fake_repo(&dir);

            let calls = repo.get_call_log().await.unwrap();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].kind, crate::model::CallKind::Incoming);

            let sms = repo.get_sms_log().await.unwrap();
            assert_eq!(sms.len(), 1);
            assert_eq!(sms[0].date, UNKNOWN);
            assert_eq!(sms[0].body, "hello");
        }
    }
}
