//! Audio/image pairing.
//!
//! Audio keeps its collection order so the publish schedule follows the
//! order the user uploaded tracks in. Images are shuffled once so repeated
//! batches with the same artwork pool do not always produce the same
//! cover for the same track.

use rand::seq::SliceRandom;
use rand::Rng;

use bcast_models::RawAsset;

/// One audio asset matched with one image asset.
pub type AssetPair = (RawAsset, RawAsset);

/// Pair each audio asset with a shuffled image.
///
/// The output length is the shorter of the two inputs; callers enforce
/// count equality before invoking the pipeline.
pub fn pair_assets<R: Rng + ?Sized>(
    audio: Vec<RawAsset>,
    mut images: Vec<RawAsset>,
    rng: &mut R,
) -> Vec<AssetPair> {
    images.shuffle(rng);
    audio.into_iter().zip(images).collect()
}
