extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::arena::Region;
use crate::error::HistError;
use crate::perceptual::{to_perceptual, PerceptualColor};
use crate::HistogramConfig;

/// Fixed hash table width. Prime, so packed colors that share channel bit
/// patterns still spread across buckets.
const HASH_SIZE: u32 = 30029;

/// One distinct posterized color with its accumulated weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistEntry {
    pub color: PerceptualColor,
    /// Sum of per-pixel boosts of every pixel that posterized to this color.
    pub perceptual_weight: f32,
    /// Starts equal to `perceptual_weight`; reserved for the palette
    /// construction stage to reweight. Never touched here after creation.
    pub adjusted_weight: f32,
}

/// Weighted histogram of the distinct posterized colors of one image.
///
/// Entry order is an artifact of bucket iteration — not meaningful, but
/// deterministic for a given input.
#[derive(Debug, Clone)]
pub struct Histogram {
    entries: Vec<HistEntry>,
}

impl Histogram {
    pub fn entries(&self) -> &[HistEntry] {
        &self.entries
    }

    /// Mutable access for the external reweighting stage (`adjusted_weight`).
    pub fn entries_mut(&mut self) -> &mut [HistEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of `perceptual_weight` across all entries, accumulated in f64.
    pub fn total_weight(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| f64::from(e.perceptual_weight))
            .sum()
    }
}

/// Chain node for one posterized color. Lives in the table's region; freed
/// only when the whole region goes.
#[derive(Debug)]
struct ChainNode {
    color: u32,
    weight: f32,
    next: Option<u32>,
}

/// Transient chained hash table from packed posterized color to accumulated
/// weight. Created, filled by one image scan, flattened once, then dropped.
struct ColorTable {
    buckets: Vec<Option<u32>>,
    nodes: Region<ChainNode>,
    colors: u32,
}

impl ColorTable {
    fn new() -> Self {
        Self {
            buckets: vec![None; HASH_SIZE as usize],
            nodes: Region::new(),
            colors: 0,
        }
    }

    /// Add `boost` to the weight of `packed`, inserting a new head node on
    /// first sight. Errors when the distinct-color cap would be exceeded.
    fn add(&mut self, packed: u32, boost: f32, max_colors: u32) -> Result<(), HistError> {
        let bucket = (packed % HASH_SIZE) as usize;

        let mut cursor = self.buckets[bucket];
        while let Some(handle) = cursor {
            let node = self.nodes.get_mut(handle);
            if node.color == packed {
                node.weight += boost;
                return Ok(());
            }
            cursor = node.next;
        }

        if self.colors >= max_colors {
            return Err(HistError::TooManyColors { max_colors });
        }
        self.colors += 1;

        let head = self.buckets[bucket];
        let handle = self
            .nodes
            .alloc(ChainNode {
                color: packed,
                weight: boost,
                next: head,
            })
            .map_err(|_| HistError::OutOfMemory)?;
        self.buckets[bucket] = Some(handle);
        Ok(())
    }

    /// Flatten into histogram entries: buckets in index order, chains head
    /// to tail. Consumes the table; the region is released on return.
    fn into_histogram(self, gamma: f64) -> Histogram {
        let mut entries = Vec::with_capacity(self.colors as usize);

        for head in &self.buckets {
            let mut cursor = *head;
            while let Some(handle) = cursor {
                let node = self.nodes.get(handle);
                let weight = node.weight;
                entries.push(HistEntry {
                    color: to_perceptual(gamma, unpack(node.color)),
                    perceptual_weight: weight,
                    adjusted_weight: weight,
                });
                cursor = node.next;
            }
        }

        Histogram { entries }
    }
}

fn pack(px: rgb::RGBA<u8>) -> u32 {
    u32::from(px.r) << 24 | u32::from(px.g) << 16 | u32::from(px.b) << 8 | u32::from(px.a)
}

fn unpack(packed: u32) -> rgb::RGBA<u8> {
    rgb::RGBA {
        r: (packed >> 24) as u8,
        g: (packed >> 16) as u8,
        b: (packed >> 8) as u8,
        a: packed as u8,
    }
}

/// Scan all pixels row-major into a color table, then flatten it.
/// Inputs are validated by the caller.
pub(crate) fn compute(
    pixels: &[rgb::RGBA<u8>],
    config: &HistogramConfig,
    importance_map: Option<&[f32]>,
) -> Result<Histogram, HistError> {
    let channel_mask = 0xFFu32 >> config.ignorebits << config.ignorebits;
    let posterize_mask =
        channel_mask << 24 | channel_mask << 16 | channel_mask << 8 | channel_mask;

    let mut table = ColorTable::new();

    for (i, px) in pixels.iter().enumerate() {
        let boost = match importance_map {
            Some(map) => 0.5 + map[i],
            None => 1.0,
        };
        table.add(pack(*px) & posterize_mask, boost, config.max_colors)?;
    }

    Ok(table.into_histogram(config.gamma))
}
