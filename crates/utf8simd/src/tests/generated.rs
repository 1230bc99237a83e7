//! Inputs built from byte ranges: every combination of the low, middle and
//! high value of each range.

use alloc::{vec, vec::Vec};

use super::utils::check;

type Range = (u8, u8);

const ANY: Range = (0x00, 0xFF);
const ASCII: Range = (0x00, 0x7F);
const CONT: Range = (0x80, 0xBF);

const fn one(byte: u8) -> Range {
    (byte, byte)
}

fn expand(ranges: &[Range]) -> Vec<Vec<u8>> {
    let Some((&(low, high), rest)) = ranges.split_first() else {
        return vec![Vec::new()];
    };
    let mut picks = vec![low];
    let mid = low + (high - low) / 2;
    if mid != low && mid != high {
        picks.push(mid);
    }
    if high != low {
        picks.push(high);
    }

    let tails = expand(rest);
    picks
        .into_iter()
        .flat_map(|head| {
            tails.iter().map(move |tail| {
                let mut out = Vec::with_capacity(tail.len() + 1);
                out.push(head);
                out.extend_from_slice(tail);
                out
            })
        })
        .collect()
}

fn shapes() -> Vec<Vec<Range>> {
    vec![
        vec![one(0x20), ASCII, ASCII, ASCII],
        // Two-byte sequences.
        vec![one(0xC2)],
        vec![one(0xC2), ASCII],
        vec![one(0xC2), CONT],
        vec![one(0xC2), (0xC0, 0xFF)],
        vec![one(0xC2), CONT, CONT],
        vec![one(0xC2), CONT, CONT, CONT],
        // Three-byte sequences.
        vec![one(0xE1)],
        vec![one(0xE1), CONT],
        vec![one(0xE1), CONT, CONT],
        vec![one(0xE1), CONT, CONT, ASCII],
        vec![one(0xE1), CONT, ASCII],
        vec![one(0xE1), CONT, CONT, CONT],
        // Four-byte sequences.
        vec![one(0xF1)],
        vec![one(0xF1), CONT],
        vec![one(0xF1), CONT, CONT],
        vec![one(0xF1), CONT, CONT, CONT],
        vec![one(0xF1), CONT, CONT, ASCII],
        vec![one(0xF1), CONT, CONT, CONT, ASCII],
        // Overlong and constrained leads.
        vec![(0xC0, 0xC1), ANY],
        vec![(0xC0, 0xC1), ANY, ANY],
        vec![(0xC0, 0xC1), ANY, ANY, ANY],
        vec![one(0xE0), (0x00, 0x9F), CONT],
        vec![one(0xE0), (0xA0, 0xBF), CONT],
        vec![one(0xED), (0x80, 0x9F), CONT],
        vec![one(0xED), (0xA0, 0xBF), CONT],
        vec![one(0xF0), (0x80, 0x8F), CONT, CONT],
        vec![one(0xF0), (0x90, 0xBF), CONT, CONT],
        vec![one(0xF4), (0x80, 0x8F), CONT, CONT],
        vec![one(0xF4), (0x90, 0xBF), CONT, CONT],
        vec![(0xF5, 0xFF), CONT, CONT, CONT],
    ]
}

pub(crate) fn examples() -> Vec<Vec<u8>> {
    shapes().iter().flat_map(|shape| expand(shape)).collect()
}

#[test]
fn expand_picks_low_mid_high() {
    assert_eq!(expand(&[(0x80, 0xBF)]), vec![vec![0x80], vec![0x9F], vec![0xBF]]);
    assert_eq!(expand(&[one(0xC2), (0xC0, 0xC1)]), vec![vec![0xC2, 0xC0], vec![0xC2, 0xC1]]);
    assert_eq!(expand(&[]), vec![Vec::<u8>::new()]);
}

#[test]
fn generated_examples_agree() {
    for example in examples() {
        check(&example);
    }
}
