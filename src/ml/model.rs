// ============================================================
// Layer 5 — Extractive Q&A Transformer
// ============================================================
// BERT-style encoder with a two-logit span head, laid out so
// that published BERT / RoBERTa question-answering checkpoints
// load into it after key remapping (see infra/checkpoint.rs):
//
//   token ids ─► word emb + position emb + token-type emb
//             ─► LayerNorm
//             ─► N × EncoderLayer (self-attn → add&norm → FFN → add&norm)
//             ─► Linear(d_model, 2) ─► start logits, end logits
//
// Inference runs one sequence at a time with no padding, so
// no attention mask is needed. The sequence length must not
// exceed max_seq_len(); the scorer checks this before calling
// forward().

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

#[derive(Config, Debug)]
pub struct ExtractiveQaConfig {
    pub vocab_size:              usize,
    pub max_position_embeddings: usize,
    /// 2 for BERT (question / context segments), 1 for RoBERTa
    pub type_vocab_size:         usize,
    pub d_model:                 usize,
    pub num_heads:               usize,
    pub num_layers:              usize,
    pub d_ff:                    usize,
    /// Position id of the first token. RoBERTa starts at padding_idx + 1.
    #[config(default = 0)]
    pub position_offset:         usize,
    #[config(default = 1e-12)]
    pub layer_norm_eps:          f64,
}

impl ExtractiveQaConfig {
    /// Longest token sequence the position table can address.
    pub fn max_seq_len(&self) -> usize {
        self.max_position_embeddings.saturating_sub(self.position_offset)
    }

    /// Check the architecture is buildable before allocating weights.
    pub fn validate(&self) -> Result<(), String> {
        if self.vocab_size == 0 || self.d_model == 0 || self.num_layers == 0 {
            return Err("vocab_size, d_model and num_layers must be non-zero".to_string());
        }
        if self.type_vocab_size == 0 {
            return Err("type_vocab_size must be at least 1".to_string());
        }
        if self.num_heads == 0 || self.d_model % self.num_heads != 0 {
            return Err(format!(
                "d_model ({}) must be divisible by num_heads ({})",
                self.d_model, self.num_heads
            ));
        }
        // [CLS] q [SEP] c [SEP] needs at least 3 special positions plus one token
        if self.max_seq_len() < 4 {
            return Err(format!(
                "max_position_embeddings ({}) leaves only {} usable positions",
                self.max_position_embeddings,
                self.max_seq_len()
            ));
        }
        Ok(())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> ExtractiveQaModel<B> {
        let layers = (0..self.num_layers)
            .map(|_| self.init_layer(device))
            .collect();

        ExtractiveQaModel {
            embeddings: Embeddings {
                word_embeddings:       EmbeddingConfig::new(self.vocab_size, self.d_model).init(device),
                position_embeddings:   EmbeddingConfig::new(self.max_position_embeddings, self.d_model).init(device),
                token_type_embeddings: EmbeddingConfig::new(self.type_vocab_size, self.d_model).init(device),
                layer_norm:            self.norm(device),
                position_offset:       self.position_offset,
            },
            layers,
            span_head: LinearConfig::new(self.d_model, 2).init(device),
        }
    }

    fn init_layer<B: Backend>(&self, device: &B::Device) -> EncoderLayer<B> {
        EncoderLayer {
            attention: MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
                .with_dropout(0.0)
                .init(device),
            attn_norm: self.norm(device),
            ffn_in:    LinearConfig::new(self.d_model, self.d_ff).init(device),
            ffn_out:   LinearConfig::new(self.d_ff, self.d_model).init(device),
            ffn_norm:  self.norm(device),
        }
    }

    fn norm<B: Backend>(&self, device: &B::Device) -> LayerNorm<B> {
        LayerNormConfig::new(self.d_model)
            .with_epsilon(self.layer_norm_eps)
            .init(device)
    }
}

#[derive(Module, Debug)]
pub struct Embeddings<B: Backend> {
    pub word_embeddings:       Embedding<B>,
    pub position_embeddings:   Embedding<B>,
    pub token_type_embeddings: Embedding<B>,
    pub layer_norm:            LayerNorm<B>,
    pub position_offset:       usize,
}

impl<B: Backend> Embeddings<B> {
    /// ids, segments: [batch, seq_len] → [batch, seq_len, d_model]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>, token_type_ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch_size, seq_len] = input_ids.dims();
        let device = input_ids.device();

        let first = self.position_offset as i64;
        let positions = Tensor::<B, 1, Int>::arange(first..first + seq_len as i64, &device)
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);

        let x = self.word_embeddings.forward(input_ids)
            + self.position_embeddings.forward(positions)
            + self.token_type_embeddings.forward(token_type_ids);
        self.layer_norm.forward(x)
    }
}

#[derive(Module, Debug)]
pub struct EncoderLayer<B: Backend> {
    pub attention: MultiHeadAttention<B>,
    pub attn_norm: LayerNorm<B>,
    pub ffn_in:    Linear<B>,
    pub ffn_out:   Linear<B>,
    pub ffn_norm:  LayerNorm<B>,
}

impl<B: Backend> EncoderLayer<B> {
    /// x: [batch, seq_len, d_model] → same shape
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let attended = self.attention.forward(MhaInput::self_attn(x.clone())).context;
        let x = self.attn_norm.forward(x + attended);

        let hidden = burn::tensor::activation::gelu(self.ffn_in.forward(x.clone()));
        self.ffn_norm.forward(x + self.ffn_out.forward(hidden))
    }
}

#[derive(Module, Debug)]
pub struct ExtractiveQaModel<B: Backend> {
    pub embeddings: Embeddings<B>,
    pub layers:     Vec<EncoderLayer<B>>,
    pub span_head:  Linear<B>,
}

/// Raw per-token span logits, each [batch, seq_len].
pub struct SpanLogits<B: Backend> {
    pub start: Tensor<B, 2>,
    pub end:   Tensor<B, 2>,
}

impl<B: Backend> ExtractiveQaModel<B> {
    /// input_ids, token_type_ids: [batch, seq_len] → start/end logits: [batch, seq_len]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>, token_type_ids: Tensor<B, 2, Int>) -> SpanLogits<B> {
        let [batch_size, seq_len] = input_ids.dims();

        let mut x = self.embeddings.forward(input_ids, token_type_ids);
        for layer in &self.layers {
            x = layer.forward(x);
        }

        let logits = self.span_head.forward(x); // [batch, seq_len, 2]
        let start = logits.clone()
            .slice([0..batch_size, 0..seq_len, 0..1])
            .reshape([batch_size, seq_len]);
        let end = logits
            .slice([0..batch_size, 0..seq_len, 1..2])
            .reshape([batch_size, seq_len]);

        SpanLogits { start, end }
    }
}
