// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Reads an extractive Q&A model from a HuggingFace-style model
// directory, e.g. a download of a BERT or RoBERTa checkpoint
// fine-tuned on SQuAD:
//
//   model/
//     config.json              ← architecture (HF names)
//     model.mpk.gz             ← burn CompactRecorder weights, written by `convert`
//     model.safetensors        ← or HF weights, safetensors
//     pytorch_model.bin        ← or HF weights, PyTorch pickle
//     tokenizer.json           ← read by TokenizerStore
//
// Weights are looked up in that order. HF tensor names are
// remapped onto ExtractiveQaModel's field names while loading:
//
//   bert.encoder.layer.3.attention.self.query.weight
//     → layers.3.attention.query.weight
//
// The config has to be read first: the model must be built
// with the exact architecture before weights can be loaded.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, HalfPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};
use burn_import::pytorch::{LoadArgs as PyTorchLoadArgs, PyTorchFileRecorder};
use burn_import::safetensors::{LoadArgs as SafetensorsLoadArgs, SafetensorsFileRecorder};

use crate::ml::model::{ExtractiveQaConfig, ExtractiveQaModel, ExtractiveQaModelRecord};

const CONFIG_FILE:      &str = "config.json";
const NATIVE_STEM:      &str = "model";
const SAFETENSORS_FILE: &str = "model.safetensors";
const PYTORCH_FILE:     &str = "pytorch_model.bin";

/// HF parameter name → ExtractiveQaModel parameter name, applied in order.
const KEY_REMAP: &[(&str, &str)] = &[
    (r"^(bert|roberta)\.", ""),
    (r"^embeddings\.LayerNorm\.", "embeddings.layer_norm."),
    (r"^encoder\.layer\.([0-9]+)\.attention\.self\.(query|key|value)\.", "layers.${1}.attention.${2}."),
    (r"^encoder\.layer\.([0-9]+)\.attention\.output\.dense\.", "layers.${1}.attention.output."),
    (r"^encoder\.layer\.([0-9]+)\.attention\.output\.LayerNorm\.", "layers.${1}.attn_norm."),
    (r"^encoder\.layer\.([0-9]+)\.intermediate\.dense\.", "layers.${1}.ffn_in."),
    (r"^encoder\.layer\.([0-9]+)\.output\.dense\.", "layers.${1}.ffn_out."),
    (r"^encoder\.layer\.([0-9]+)\.output\.LayerNorm\.", "layers.${1}.ffn_norm."),
    (r"^qa_outputs\.", "span_head."),
];

/// A weights file found in the model directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightsFile {
    /// Path WITHOUT extension (the recorder adds it)
    Native(PathBuf),
    Safetensors(PathBuf),
    PyTorch(PathBuf),
}

/// The subset of a HF `config.json` this model understands.
#[derive(Debug, Deserialize)]
struct PretrainedConfig {
    #[serde(default)]
    model_type:              String,
    vocab_size:              usize,
    hidden_size:             usize,
    num_attention_heads:     usize,
    num_hidden_layers:       usize,
    intermediate_size:       usize,
    max_position_embeddings: usize,
    #[serde(default = "default_type_vocab_size")]
    type_vocab_size:         usize,
    #[serde(default = "default_layer_norm_eps")]
    layer_norm_eps:          f64,
    pad_token_id:            Option<usize>,
    #[serde(default = "default_hidden_act")]
    hidden_act:              String,
}

fn default_type_vocab_size() -> usize { 2 }
fn default_layer_norm_eps() -> f64 { 1e-12 }
fn default_hidden_act() -> String { "gelu".to_string() }

impl PretrainedConfig {
    fn into_model_config(self) -> Result<ExtractiveQaConfig> {
        if !self.hidden_act.starts_with("gelu") {
            anyhow::bail!("unsupported activation '{}' (only gelu)", self.hidden_act);
        }
        // RoBERTa-family models number positions from padding_idx + 1
        let position_offset = match self.model_type.as_str() {
            "roberta" | "xlm-roberta" | "camembert" => self.pad_token_id.unwrap_or(1) + 1,
            _ => 0,
        };
        Ok(ExtractiveQaConfig::new(
            self.vocab_size,
            self.max_position_embeddings,
            self.type_vocab_size,
            self.hidden_size,
            self.num_attention_heads,
            self.num_hidden_layers,
            self.intermediate_size,
        )
        .with_position_offset(position_offset)
        .with_layer_norm_eps(self.layer_norm_eps))
    }
}

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load and validate the model architecture.
    pub fn load_config(&self) -> Result<ExtractiveQaConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Cannot read model config '{}'", path.display()))?;

        let pretrained: PretrainedConfig = serde_json::from_str(&json)
            .with_context(|| format!("Malformed model config '{}'", path.display()))?;
        let cfg = pretrained
            .into_model_config()
            .with_context(|| format!("Invalid model config '{}'", path.display()))?;

        cfg.validate()
            .map_err(|e| anyhow::anyhow!("Invalid model config '{}': {e}", path.display()))?;
        Ok(cfg)
    }

    /// Build the model from config and load the preferred weights file.
    pub fn load_model<B: Backend>(
        &self,
        cfg:    &ExtractiveQaConfig,
        device: &B::Device,
    ) -> Result<ExtractiveQaModel<B>> {
        let weights = self.locate_weights()?;
        self.load_weights(cfg, &weights, device)
    }

    pub fn load_weights<B: Backend>(
        &self,
        cfg:     &ExtractiveQaConfig,
        weights: &WeightsFile,
        device:  &B::Device,
    ) -> Result<ExtractiveQaModel<B>> {
        tracing::info!("Loading model weights from {:?}", weights);

        let record: ExtractiveQaModelRecord<B> = match weights {
            WeightsFile::Native(stem) => NamedMpkGzFileRecorder::<HalfPrecisionSettings>::new().load(stem.clone(), device),
            WeightsFile::Safetensors(path) => {
                let args = KEY_REMAP.iter().fold(
                    SafetensorsLoadArgs::new(path.clone()),
                    |args, (from, to)| args.with_key_remap(from, to),
                );
                SafetensorsFileRecorder::<FullPrecisionSettings>::default().load(args, device)
            }
            WeightsFile::PyTorch(path) => {
                let args = KEY_REMAP.iter().fold(
                    PyTorchLoadArgs::new(path.clone()),
                    |args, (from, to)| args.with_key_remap(from, to),
                );
                PyTorchFileRecorder::<FullPrecisionSettings>::default().load(args, device)
            }
        }
        .with_context(|| format!("Cannot load weights {:?}", weights))?;

        Ok(cfg.init::<B>(device).load_record(record))
    }

    /// Write `model` as `model.mpk.gz`, which then takes precedence
    /// over the HF weight files. Returns the written path.
    pub fn save_native<B: Backend>(&self, model: &ExtractiveQaModel<B>) -> Result<PathBuf> {
        let stem = self.dir.join(NATIVE_STEM);
        NamedMpkGzFileRecorder::<HalfPrecisionSettings>::new()
            .record(model.clone().into_record(), stem.clone())
            .with_context(|| format!("Failed to save weights to '{}'", stem.display()))?;
        Ok(with_recorder_ext(&stem))
    }

    /// Weights to serve from: burn-native first, then the HF files.
    pub fn locate_weights(&self) -> Result<WeightsFile> {
        let native = self.dir.join(NATIVE_STEM);
        if with_recorder_ext(&native).exists() {
            return Ok(WeightsFile::Native(native));
        }
        self.locate_pretrained()
    }

    /// HF weights only; the input of `convert`.
    pub fn locate_pretrained(&self) -> Result<WeightsFile> {
        let safetensors = self.dir.join(SAFETENSORS_FILE);
        if safetensors.exists() {
            return Ok(WeightsFile::Safetensors(safetensors));
        }
        let pytorch = self.dir.join(PYTORCH_FILE);
        if pytorch.exists() {
            return Ok(WeightsFile::PyTorch(pytorch));
        }
        anyhow::bail!(
            "No model weights in '{}' (expected {}.mpk.gz, {} or {})",
            self.dir.display(),
            NATIVE_STEM,
            SAFETENSORS_FILE,
            PYTORCH_FILE
        )
    }
}

fn with_recorder_ext(stem: &Path) -> PathBuf {
    stem.with_extension("mpk.gz")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use burn::backend::ndarray::NdArrayDevice;
    use burn::backend::NdArray;
    use serde_json::json;

    pub(crate) const TINY_VOCAB: usize = 128;
    const TINY_D:  usize = 4;
    const TINY_FF: usize = 8;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    /// Write a safetensors file. Every tensor holds 0.00, 0.01, 0.02, …
    /// in row-major order.
    fn write_safetensors(path: &Path, tensors: &[(String, Vec<usize>)]) {
        let mut header = serde_json::Map::new();
        let mut data: Vec<u8> = Vec::new();
        for (name, shape) in tensors {
            let begin = data.len();
            let count: usize = shape.iter().product();
            for i in 0..count {
                data.extend_from_slice(&(i as f32 / 100.0).to_le_bytes());
            }
            header.insert(
                name.clone(),
                json!({ "dtype": "F32", "shape": shape, "data_offsets": [begin, data.len()] }),
            );
        }
        let mut header = serde_json::Value::Object(header).to_string().into_bytes();
        while header.len() % 8 != 0 {
            header.push(b' ');
        }

        let mut bytes = (header.len() as u64).to_le_bytes().to_vec();
        bytes.extend(header);
        bytes.extend(data);
        std::fs::write(path, bytes).unwrap();
    }

    /// Parameter names and shapes of a one-layer HF question-answering
    /// checkpoint ("bert" or "roberta").
    fn hf_tensors(model_type: &str, positions: usize, types: usize) -> Vec<(String, Vec<usize>)> {
        let (d, ff) = (TINY_D, TINY_FF);
        let emb = format!("{model_type}.embeddings");
        let layer = format!("{model_type}.encoder.layer.0");
        let mut t = vec![
            (format!("{emb}.word_embeddings.weight"), vec![TINY_VOCAB, d]),
            (format!("{emb}.position_embeddings.weight"), vec![positions, d]),
            (format!("{emb}.token_type_embeddings.weight"), vec![types, d]),
            (format!("{emb}.LayerNorm.weight"), vec![d]),
            (format!("{emb}.LayerNorm.bias"), vec![d]),
        ];
        for proj in ["query", "key", "value"] {
            t.push((format!("{layer}.attention.self.{proj}.weight"), vec![d, d]));
            t.push((format!("{layer}.attention.self.{proj}.bias"), vec![d]));
        }
        t.extend([
            (format!("{layer}.attention.output.dense.weight"), vec![d, d]),
            (format!("{layer}.attention.output.dense.bias"), vec![d]),
            (format!("{layer}.attention.output.LayerNorm.weight"), vec![d]),
            (format!("{layer}.attention.output.LayerNorm.bias"), vec![d]),
            (format!("{layer}.intermediate.dense.weight"), vec![ff, d]),
            (format!("{layer}.intermediate.dense.bias"), vec![ff]),
            (format!("{layer}.output.dense.weight"), vec![d, ff]),
            (format!("{layer}.output.dense.bias"), vec![d]),
            (format!("{layer}.output.LayerNorm.weight"), vec![d]),
            (format!("{layer}.output.LayerNorm.bias"), vec![d]),
            ("qa_outputs.weight".to_string(), vec![2, d]),
            ("qa_outputs.bias".to_string(), vec![2]),
        ]);
        t
    }

    /// Populate `dir` with config.json + model.safetensors of a tiny
    /// BERT (8 positions, 2 segments) or RoBERTa (10 positions from
    /// offset 2, 1 segment) question-answering model.
    pub(crate) fn write_pretrained(dir: &Path, model_type: &str) {
        let (positions, types) = if model_type == "roberta" { (10, 1) } else { (8, 2) };
        let config = json!({
            "architectures": ["ForQuestionAnswering"],
            "model_type": model_type,
            "vocab_size": TINY_VOCAB,
            "hidden_size": TINY_D,
            "num_attention_heads": 2,
            "num_hidden_layers": 1,
            "intermediate_size": TINY_FF,
            "max_position_embeddings": positions,
            "type_vocab_size": types,
            "layer_norm_eps": 1e-5,
            "pad_token_id": 1,
            "hidden_act": "gelu"
        });
        write(dir, CONFIG_FILE, &config.to_string());
        write_safetensors(&dir.join(SAFETENSORS_FILE), &hf_tensors(model_type, positions, types));
    }

    #[test]
    fn test_load_bert_config() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CONFIG_FILE,
            r#"{"model_type":"bert","vocab_size":30522,"hidden_size":768,
                "num_attention_heads":12,"num_hidden_layers":12,
                "intermediate_size":3072,"max_position_embeddings":512,
                "type_vocab_size":2,"layer_norm_eps":1e-12,"hidden_act":"gelu"}"#,
        );
        let cfg = CheckpointManager::new(dir.path()).load_config().unwrap();
        assert_eq!(cfg.vocab_size, 30522);
        assert_eq!(cfg.d_model, 768);
        assert_eq!(cfg.position_offset, 0);
        assert_eq!(cfg.max_seq_len(), 512);
    }

    #[test]
    fn test_load_roberta_config() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CONFIG_FILE,
            r#"{"model_type":"roberta","vocab_size":50265,"hidden_size":768,
                "num_attention_heads":12,"num_hidden_layers":12,
                "intermediate_size":3072,"max_position_embeddings":514,
                "type_vocab_size":1,"layer_norm_eps":1e-5,"pad_token_id":1}"#,
        );
        let cfg = CheckpointManager::new(dir.path()).load_config().unwrap();
        assert_eq!(cfg.type_vocab_size, 1);
        assert_eq!(cfg.position_offset, 2);
        assert_eq!(cfg.max_seq_len(), 512);
    }

    #[test]
    fn test_missing_config_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = CheckpointManager::new(dir.path()).load_config().unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_FILE));
    }

    #[test]
    fn test_invalid_architecture_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CONFIG_FILE,
            r#"{"vocab_size":500,"hidden_size":64,"num_attention_heads":5,
                "num_hidden_layers":2,"intermediate_size":256,
                "max_position_embeddings":128}"#,
        );
        assert!(CheckpointManager::new(dir.path()).load_config().is_err());
    }

    #[test]
    fn test_unsupported_activation_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CONFIG_FILE,
            r#"{"vocab_size":500,"hidden_size":64,"num_attention_heads":4,
                "num_hidden_layers":2,"intermediate_size":256,
                "max_position_embeddings":128,"hidden_act":"relu"}"#,
        );
        let err = CheckpointManager::new(dir.path()).load_config().unwrap_err();
        assert!(format!("{err:#}").contains("relu"));
    }

    #[test]
    fn test_weights_lookup_order() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        assert!(ckpt.locate_weights().is_err());

        write(dir.path(), PYTORCH_FILE, "");
        assert_eq!(ckpt.locate_weights().unwrap(), WeightsFile::PyTorch(dir.path().join(PYTORCH_FILE)));

        write(dir.path(), SAFETENSORS_FILE, "");
        assert_eq!(
            ckpt.locate_weights().unwrap(),
            WeightsFile::Safetensors(dir.path().join(SAFETENSORS_FILE))
        );

        write(dir.path(), "model.mpk.gz", "");
        assert_eq!(ckpt.locate_weights().unwrap(), WeightsFile::Native(dir.path().join("model")));
        // convert reads the HF file even when a native one exists
        assert!(matches!(ckpt.locate_pretrained().unwrap(), WeightsFile::Safetensors(_)));
    }

    #[test]
    fn test_loads_bert_safetensors() {
        let dir = tempfile::tempdir().unwrap();
        write_pretrained(dir.path(), "bert");

        let device = NdArrayDevice::default();
        let ckpt   = CheckpointManager::new(dir.path());
        let cfg    = ckpt.load_config().unwrap();
        let model  = ckpt.load_model::<NdArray>(&cfg, &device).unwrap();

        let words = model.embeddings.word_embeddings.weight.val();
        assert_eq!(words.dims(), [TINY_VOCAB, TINY_D]);
        let words = words.into_data().to_vec::<f32>().unwrap();
        assert!((words[5] - 0.05).abs() < 1e-6);

        // HF stores Linear weights as [out, in]; burn as [in, out]
        let head = model.span_head.weight.val();
        assert_eq!(head.dims(), [TINY_D, 2]);
        let head = head.into_data().to_vec::<f32>().unwrap();
        for i in 0..TINY_D {
            for o in 0..2 {
                let expected = (o * TINY_D + i) as f32 / 100.0;
                assert!((head[i * 2 + o] - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_loads_roberta_safetensors() {
        let dir = tempfile::tempdir().unwrap();
        write_pretrained(dir.path(), "roberta");

        let device = NdArrayDevice::default();
        let ckpt   = CheckpointManager::new(dir.path());
        let cfg    = ckpt.load_config().unwrap();
        let model  = ckpt.load_model::<NdArray>(&cfg, &device).unwrap();

        assert_eq!(cfg.max_seq_len(), 8);
        assert_eq!(model.embeddings.position_offset, 2);
        assert_eq!(model.embeddings.position_embeddings.weight.val().dims(), [10, TINY_D]);
    }

    #[test]
    fn test_native_weights_round_trip_through_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_pretrained(dir.path(), "bert");

        let device = NdArrayDevice::default();
        let ckpt   = CheckpointManager::new(dir.path());
        let cfg    = ckpt.load_config().unwrap();
        let model  = ckpt.load_model::<NdArray>(&cfg, &device).unwrap();

        let written = ckpt.save_native(&model).unwrap();
        assert_eq!(written, dir.path().join("model.mpk.gz"));
        assert!(written.exists());
        assert!(matches!(ckpt.locate_weights().unwrap(), WeightsFile::Native(_)));
        assert!(ckpt.load_model::<NdArray>(&cfg, &device).is_ok());
    }
}
