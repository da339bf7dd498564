//! Invocation of the external datacard scripts
//!
//! A finished store `<dir>/<stem>.json` is moved into `<dir>/<stem>/`, then
//!
//! ```text
//! <interpreter> <make_input_script> <dir>/<stem>/ <dir>/<stem>_out/
//! <interpreter> <datacard_script> <dir>/<stem>_out/
//! ```
//!
//! run one after the other. Both must exit successfully.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, instrument};

use crate::config::DatacardConfig;
use crate::error::{Error, Result};

/// Folders used for one datacard run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatacardPaths {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// The store after it was moved into `input_dir`
    pub store: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DatacardRunner {
    config: DatacardConfig,
}

fn remove_files(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

fn prepare_dir(dir: &Path, clean: bool) -> Result<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir)?;
    } else if clean {
        debug!("Cleaning {}", dir.display());
        remove_files(dir)?;
    }
    Ok(())
}

impl DatacardRunner {
    pub fn new(config: DatacardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DatacardConfig {
        &self.config
    }

    /// Create (or clean) the folders and move `store` into the input folder
    pub fn prepare(&self, store: &Path) -> Result<DatacardPaths> {
        let stem = store
            .file_stem()
            .ok_or_else(|| {
                Error::InvalidInput(format!("{} has no file name", store.display()))
            })?
            .to_string_lossy()
            .into_owned();
        let file_name = store
            .file_name()
            .ok_or_else(|| Error::InvalidInput(format!("{} has no file name", store.display())))?;
        let parent = store.parent().unwrap_or_else(|| Path::new("."));

        let input_dir = parent.join(&stem);
        let output_dir = parent.join(format!("{stem}_out"));
        prepare_dir(&input_dir, self.config.clean)?;
        prepare_dir(&output_dir, self.config.clean)?;

        let moved = input_dir.join(file_name);
        if fs::rename(store, &moved).is_err() {
            // rename fails across filesystems
            fs::copy(store, &moved)?;
            fs::remove_file(store)?;
        }

        Ok(DatacardPaths {
            input_dir,
            output_dir,
            store: moved,
        })
    }

    fn invoke(&self, script: &Path, args: &[&Path]) -> Result<()> {
        let mut command = Command::new(&self.config.interpreter);
        command.arg(script).args(args);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }
        if !self.config.verbose {
            command.stdout(Stdio::null());
        }

        let rendered = format!("{command:?}");
        debug!("Running {}", rendered);
        let status = command.status().map_err(|e| Error::ExternalProcess {
            command: rendered.clone(),
            status: e.to_string(),
        })?;
        if !status.success() {
            return Err(Error::ExternalProcess {
                command: rendered,
                status: status.to_string(),
            });
        }
        Ok(())
    }

    /// Prepare the folders and run both scripts
    #[instrument(skip(self), fields(interpreter = %self.config.interpreter))]
    pub fn run(&self, store: &Path) -> Result<DatacardPaths> {
        let paths = self.prepare(store)?;
        self.invoke(
            &self.config.make_input_script,
            &[&paths.input_dir, &paths.output_dir],
        )?;
        self.invoke(&self.config.datacard_script, &[&paths.output_dir])?;
        info!("Datacards written to {}", paths.output_dir.display());
        Ok(paths)
    }
}
