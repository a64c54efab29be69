// ============================================================
// Layer 2 — Convert Use Case
// ============================================================
// One-off preparation of a model directory:
//
//   Step 1: Read config.json                      (Layer 6 - infra)
//   Step 2: Load model.safetensors / pytorch_model.bin,
//           remapping HF names onto the model     (Layer 6 - infra)
//   Step 3: Save model.mpk.gz next to them        (Layer 6 - infra)
//
// Afterwards `chat` / `ask` load the burn-native file, which is
// faster to read than the HF formats.

use anyhow::{Context, Result};
use burn::prelude::Backend;
use std::path::PathBuf;

use crate::infra::checkpoint::CheckpointManager;

pub struct ConvertUseCase {
    model_dir: String,
}

impl ConvertUseCase {
    pub fn new(model_dir: impl Into<String>) -> Self {
        Self { model_dir: model_dir.into() }
    }

    /// Convert the HF weights in the model directory. Returns the
    /// path of the written burn checkpoint.
    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<PathBuf> {
        let ckpt    = CheckpointManager::new(&self.model_dir);
        let cfg     = ckpt.load_config()?;
        let weights = ckpt.locate_pretrained()?;

        let model = ckpt
            .load_weights::<B>(&cfg, &weights, device)
            .with_context(|| format!("Failed to convert model in '{}'", self.model_dir))?;

        let written = ckpt.save_native(&model)?;
        tracing::info!("Saved burn checkpoint to '{}'", written.display());
        Ok(written)
    }
}
