// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Full train + validation loop over augmented image batches.
//
// Backend split:
//   - Training uses TrainBackend (Autodiff<NdArray>) for
//     gradients
//   - model.valid() returns the model on EvalBackend (NdArray),
//     so validation pays no autodiff overhead
//   - argmax(1) returns [batch, 1], squeeze before .equal()
//
// Per epoch: the train indices are reshuffled, floor(train /
// batch) full batches are drawn (at least one), every sample in
// a batch passes through the augmentation policy, and Adam steps
// once per batch with a decaying learning rate
//
//   lr(epoch) = initial_lr / (1 + decay * epoch),
//   decay     = initial_lr / epochs.
//
// After the last epoch the artifact (weights + config + labels)
// is persisted once, overwriting any previous artifact.
//
// Reference: Kingma & Ba (2015) Adam

use anyhow::{anyhow, Result};
use burn::{
    data::{dataloader::batcher::Batcher, dataset::Dataset},
    module::AutodiffModule,
    nn::loss::CrossEntropyLossConfig,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::ElementConversion,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    augment::AugmentationPolicy,
    batcher::ImageBatcher,
    dataset::{FruitDataset, ImageSample},
};
use crate::domain::label_codec::LabelCodec;
use crate::infra::artifact::ArtifactStore;
use crate::infra::history::{EpochMetrics, TrainingHistory};
use crate::ml::model::ClassifierConfig;

type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
type EvalBackend  = burn::backend::NdArray;

pub fn run_training(
    config:    &TrainConfig,
    train_set: FruitDataset,
    val_set:   FruitDataset,
    policy:    &AugmentationPolicy,
    codec:     &LabelCodec,
    store:     &ArtifactStore,
) -> Result<TrainingHistory> {
    let n_train = train_set.len();
    if n_train == 0 {
        return Err(anyhow!("training set is empty"));
    }
    if codec.is_empty() {
        return Err(anyhow!("no classes discovered"));
    }

    let device = burn::backend::ndarray::NdArrayDevice::default();

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model = ClassifierConfig::new(codec.num_classes()).init::<TrainBackend>(&device);
    tracing::info!(
        "Model ready: {} classes, {} training / {} validation samples",
        codec.num_classes(),
        n_train,
        val_set.len(),
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();
    let decay = config.initial_lr / config.epochs as f64;

    let train_batcher = ImageBatcher::<TrainBackend>::new(device.clone());
    let val_batcher   = ImageBatcher::<EvalBackend>::new(device.clone());

    // One RNG drives both the per-epoch reshuffle and the
    // augmentation draws, so a fixed seed fixes the entire run.
    let mut rng = StdRng::seed_from_u64(config.seed);

    let batch_size = config.batch_size.max(1);
    let steps = (n_train / batch_size).max(1);

    let mut history = TrainingHistory::new();

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=config.epochs {
        let lr = config.initial_lr / (1.0 + decay * (epoch - 1) as f64);

        let mut indices: Vec<usize> = (0..n_train).collect();
        indices.shuffle(&mut rng);

        // ── Training phase ────────────────────────────────────────────────────
        let mut loss_sum      = 0.0f64;
        let mut batches       = 0usize;
        let mut correct       = 0usize;
        let mut seen          = 0usize;

        for step in 0..steps {
            let start = step * batch_size;
            let end = (start + batch_size).min(n_train);
            if start >= end {
                break;
            }

            let items: Vec<ImageSample> = indices[start..end]
                .iter()
                .filter_map(|&i| train_set.get(i))
                .map(|s| ImageSample {
                    image: policy.apply(&s.image, &mut rng),
                    label: s.label,
                })
                .collect();

            let batch = train_batcher.batch(items);
            let targets = batch.targets.clone();

            let (loss, logits) = model.forward_loss(batch.images, batch.targets);

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            // argmax(1) keeps the class dim: [batch, 1] -> [batch]
            let predicted = logits.argmax(1).flatten::<1>(0, 1);
            seen    += targets.dims()[0];
            correct += predicted
                .equal(targets)
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>() as usize;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);
        }

        let train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let train_acc  = if seen > 0 { correct as f64 / seen as f64 } else { 0.0 };

        // ── Validation phase ──────────────────────────────────────────────────
        // dropout-free deterministic evaluation on the inner backend
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches  = 0usize;
        let mut val_correct  = 0usize;
        let mut val_seen     = 0usize;

        let mut offset = 0usize;
        while offset < val_set.len() {
            let end = (offset + batch_size).min(val_set.len());
            let items: Vec<ImageSample> =
                (offset..end).filter_map(|i| val_set.get(i)).collect();
            offset = end;
            if items.is_empty() {
                continue;
            }

            let batch = val_batcher.batch(items);
            let logits = model_valid.forward(batch.images);

            let ce = CrossEntropyLossConfig::new().init(&logits.device());
            let loss = ce.forward(logits.clone(), batch.targets.clone());
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;

            let predicted = logits.argmax(1).flatten::<1>(0, 1);
            val_seen    += batch.targets.dims()[0];
            val_correct += predicted
                .equal(batch.targets)
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>() as usize;
        }

        let val_loss = if val_batches > 0 { val_loss_sum / val_batches as f64 } else { f64::NAN };
        let val_acc  = if val_seen > 0 { val_correct as f64 / val_seen as f64 } else { 0.0 };

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | train_acc={:.1}% | val_acc={:.1}%",
            epoch, config.epochs, train_loss, val_loss,
            train_acc * 100.0, val_acc * 100.0,
        );

        history.push(EpochMetrics { epoch, train_loss, val_loss, train_acc, val_acc });
    }

    // ── Persist the artifact ──────────────────────────────────────────────────
    store.save(&model.valid(), config, codec)?;
    tracing::info!("Training complete, artifact persisted");

    Ok(history)
}
