//! Dispatch Table.
//!
//! Maps an instruction word to exactly one handler, or to the illegal-instruction
//! sentinel. The table is immutable once built and is rebuilt whenever the
//! enabled-extension set changes.
//!
//! Lookup is two-level:
//! 1. **Partition:** 16-bit words by quadrant and `funct3` (`bits[1:0]`, `bits[15:13]`),
//!    32-bit words by major opcode (`bits[6:2]`). An entry whose mask leaves partition
//!    bits open is placed in every compatible partition.
//! 2. **Candidates:** Within a partition, entries are ordered by descending mask
//!    popcount, ties kept in declaration order. The first `word & mask == match` wins.
//!
//! Building rejects patterns whose match sets bits outside the mask, and pairs of
//! entries from different extensions whose encodings overlap, unless both are
//! declared overlap-tolerant.

use crate::common::error::{DispatchError, Trap};
use crate::core::Cpu;
use crate::ext::{Handler, InsnDesc};
use crate::isa::{Insn, InsnLength, Pattern};

/// Partition count for each word length.
const PARTITIONS: usize = 32;

/// Partition-selecting bits of a 16-bit word.
const COMPRESSED_PARTITION_MASK: u32 = 0xe003;

/// Partition-selecting bits of a 32-bit word.
const STANDARD_PARTITION_MASK: u32 = 0x7f;

/// The illegal-instruction sentinel.
pub fn illegal_instruction(_cpu: &mut Cpu, insn: Insn, _pc: u64) -> Result<u64, Trap> {
    Err(Trap::IllegalInstruction(insn.bits()))
}

/// One candidate in a partition.
#[derive(Clone, Debug)]
pub struct DispatchEntry {
    /// Mnemonic.
    pub name: &'static str,
    /// Contributing extension (lowercase).
    pub extension: String,
    /// Encoding.
    pub pattern: Pattern,
    /// Semantics.
    pub handler: Handler,
    may_overlap: bool,
    order: usize,
}

/// Immutable two-level lookup structure.
#[derive(Clone, Debug)]
pub struct DispatchTable {
    compressed: Vec<Vec<DispatchEntry>>,
    standard: Vec<Vec<DispatchEntry>>,
    entries: usize,
}

const fn compressed_partition_word(p: usize) -> u32 {
    (((p >> 2) as u32) << 13) | (p as u32 & 0b11)
}

const fn standard_partition_word(p: usize) -> u32 {
    ((p as u32) << 2) | 0b11
}

const fn compatible(pattern: Pattern, partition_mask: u32, partition_word: u32) -> bool {
    pattern.mask & partition_mask & (pattern.matched ^ partition_word) == 0
}

impl DispatchTable {
    /// Builds a table from `(extension, instruction)` pairs in declaration order.
    ///
    /// # Errors
    ///
    /// [`DispatchError::MalformedEntry`] for a pattern with match bits outside its
    /// mask, [`DispatchError::Overlap`] for overlapping encodings contributed by
    /// different extensions.
    pub fn build<'a, I>(entries: I) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = (&'a str, &'a InsnDesc)>,
    {
        let mut compressed: Vec<Vec<DispatchEntry>> = vec![Vec::new(); PARTITIONS];
        let mut standard: Vec<Vec<DispatchEntry>> = vec![Vec::new(); PARTITIONS];
        let mut count = 0;

        for (order, (ext, desc)) in entries.into_iter().enumerate() {
            if !desc.pattern.is_well_formed() {
                return Err(DispatchError::MalformedEntry(desc.name.to_string()));
            }
            let entry = DispatchEntry {
                name: desc.name,
                extension: ext.to_ascii_lowercase(),
                pattern: desc.pattern,
                handler: desc.handler,
                may_overlap: desc.may_overlap,
                order,
            };
            for p in 0..PARTITIONS {
                // Quadrant 3 is the 32-bit space.
                if p & 0b11 != 0b11
                    && compatible(desc.pattern, COMPRESSED_PARTITION_MASK, compressed_partition_word(p))
                {
                    compressed[p].push(entry.clone());
                }
                if compatible(desc.pattern, STANDARD_PARTITION_MASK, standard_partition_word(p)) {
                    standard[p].push(entry.clone());
                }
            }
            count += 1;
        }

        for partition in compressed.iter_mut().chain(standard.iter_mut()) {
            check_overlaps(partition)?;
            partition.sort_by(|a, b| {
                b.pattern
                    .specificity()
                    .cmp(&a.pattern.specificity())
                    .then(a.order.cmp(&b.order))
            });
        }

        tracing::debug!(entries = count, "built dispatch table");
        Ok(Self {
            compressed,
            standard,
            entries: count,
        })
    }

    /// Number of instructions the table was built from.
    pub const fn len(&self) -> usize {
        self.entries
    }

    /// Returns `true` when the table was built from nothing.
    pub const fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// The matching entry, or `None` when the word is illegal.
    pub fn lookup(&self, insn: Insn) -> Option<&DispatchEntry> {
        let bits = insn.bits();
        let (partition, word) = match insn.length() {
            InsnLength::Compressed => {
                let p = ((((bits >> 13) & 0b111) << 2) | (bits & 0b11)) as usize;
                (&self.compressed[p], bits as u32 & 0xffff)
            }
            InsnLength::Standard => (&self.standard[((bits >> 2) & 0x1f) as usize], bits as u32),
            _ => return None,
        };
        partition.iter().find(|e| e.pattern.matches(word))
    }

    /// The handler for `insn`, or the illegal-instruction sentinel.
    #[inline]
    pub fn resolve(&self, insn: Insn) -> Handler {
        self.lookup(insn)
            .map_or(illegal_instruction as Handler, |e| e.handler)
    }
}

fn check_overlaps(partition: &[DispatchEntry]) -> Result<(), DispatchError> {
    for (i, a) in partition.iter().enumerate() {
        for b in &partition[i + 1..] {
            if a.extension == b.extension || (a.may_overlap && b.may_overlap) {
                continue;
            }
            if a.pattern.overlaps(b.pattern) {
                return Err(DispatchError::Overlap {
                    first: a.name.to_string(),
                    first_ext: a.extension.clone(),
                    second: b.name.to_string(),
                    second_ext: b.extension.clone(),
                    mask: a.pattern.mask,
                    matched: a.pattern.matched,
                });
            }
        }
    }
    Ok(())
}
