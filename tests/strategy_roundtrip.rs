// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bit-exact round trips and capacity enforcement for every strategy.

mod common;

use common::{all_strategies, init_tracing, random_bits, textured_carrier};
use lineage_mark::{Embedder, FrameFormat, Strategy, WatermarkError, Watermarker};

#[test]
fn full_capacity_roundtrip_every_strategy() {
    init_tracing();
    let cover = textured_carrier(256, 256, 7);
    for strategy in all_strategies() {
        let cap = strategy.capacity(&cover);
        assert!(cap > 0, "{} has no capacity", strategy.name());
        let bits = random_bits(cap, 99);
        let marked = strategy.embed(&cover, &bits).unwrap();
        assert_eq!(strategy.extract(&marked, cap), bits, "{} lost bits", strategy.name());
    }
}

#[test]
fn expected_capacities_at_256() {
    let cover = textured_carrier(256, 256, 1);
    let caps: Vec<(&str, usize)> = all_strategies().iter().map(|s| (s.name(), s.capacity(&cover))).collect();
    assert_eq!(
        caps,
        vec![
            ("pixel_parity", 65536),
            ("subband_lsb", 16384),
            ("block_quant", 1024),
            ("robust_quant", 512),
        ]
    );
}

#[test]
fn one_bit_over_capacity_fails() {
    let cover = textured_carrier(128, 96, 3);
    for strategy in all_strategies() {
        let cap = strategy.capacity(&cover);
        assert!(strategy.embed(&cover, &random_bits(cap, 5)).is_ok(), "{}", strategy.name());
        match strategy.embed(&cover, &random_bits(cap + 1, 5)) {
            Err(WatermarkError::Capacity { required, available }) => {
                assert_eq!((required, available), (cap + 1, cap), "{}", strategy.name());
            }
            other => panic!("{}: expected capacity error, got {other:?}", strategy.name()),
        }
    }
}

#[test]
fn oversized_extraction_is_truncated() {
    let cover = textured_carrier(64, 64, 11);
    for strategy in all_strategies() {
        let cap = strategy.capacity(&cover);
        assert_eq!(strategy.extract(&cover, cap * 4 + 17).len(), cap, "{}", strategy.name());
    }
}

#[test]
fn embedding_is_deterministic() {
    let cover = textured_carrier(96, 96, 21);
    for strategy in all_strategies() {
        let bits = random_bits(strategy.capacity(&cover).min(300), 8);
        let a = strategy.embed(&cover, &bits).unwrap();
        let b = strategy.embed(&cover, &bits).unwrap();
        assert_eq!(a, b, "{}", strategy.name());
    }
}

#[test]
fn message_roundtrip_every_strategy() {
    init_tracing();
    let cover = textured_carrier(256, 256, 42);
    for strategy in all_strategies() {
        let name = strategy.name();
        let wm = Watermarker::with_strategy(strategy).unwrap();
        let out = wm.embed(&cover, "héllo ✓").unwrap();
        let report = wm.extract(&out.carrier);
        assert_eq!(report.format(), FrameFormat::HashBased, "{name}");
        assert_eq!(report.messages(), ["héllo ✓".to_string()], "{name}");
        assert_eq!(report.hash(), Some(out.original_hash), "{name}");
    }
}

#[test]
fn unaligned_carrier_roundtrip() {
    let cover = textured_carrier(250, 190, 5);
    for strategy in all_strategies() {
        let name = strategy.name();
        let wm = Watermarker::with_strategy(strategy).unwrap();
        let out = wm.embed(&cover, "odd").unwrap();
        let report = wm.extract(&out.carrier);
        assert_eq!(report.messages(), ["odd".to_string()], "{name}");
    }
}

#[test]
fn wavelet_strategies_pad_the_output() {
    let cover = textured_carrier(250, 190, 5);
    let robust = Watermarker::with_strategy(Strategy::default()).unwrap();
    let out = robust.embed(&cover, "pad").unwrap();
    assert_eq!((out.carrier.width(), out.carrier.height()), (252, 192));

    let block = Watermarker::with_strategy(all_strategies().remove(2)).unwrap();
    let out = block.embed(&cover, "pad").unwrap();
    assert_eq!((out.carrier.width(), out.carrier.height()), (250, 190));
}
