use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::training::history::TrainingHistory;

pub fn save_history(path: &Path, history: &TrainingHistory) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, history)?;
    writer.flush()?;
    Ok(())
}

pub fn load_history(path: &Path) -> Result<TrainingHistory> {
    let reader = BufReader::new(File::open(path)?);
    let history = serde_json::from_reader(reader)?;
    Ok(history)
}
