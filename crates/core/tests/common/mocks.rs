use mockall::mock;
use rviss_core::common::{AccessType, MemAccess, Trap};
use rviss_core::isa::Insn;
use rviss_core::soc::{FlushScope, Memory, TraceSink};

mock! {
    pub Tracer {}

    impl TraceSink for Tracer {
        fn retired(&mut self, pc: u64, insn: Insn);
        fn trap(&mut self, pc: u64, trap: Trap);
        fn mem_access(&mut self, access: MemAccess);
        fn fence_i(&mut self);
        fn sfence_vma(&mut self, scope: FlushScope);
        fn satp_write(&mut self, value: u64);
    }
}

mock! {
    pub Memory {}

    impl Memory for Memory {
        fn load(&mut self, addr: u64, size: usize, kind: AccessType) -> Result<u64, Trap>;
        fn store(&mut self, addr: u64, size: usize, value: u64) -> Result<(), Trap>;
        fn compare_and_swap(
            &mut self,
            addr: u64,
            size: usize,
            expected: u64,
            new: u64,
        ) -> Result<u64, Trap>;
        fn reserve(&mut self, addr: u64);
        fn check_reservation(&self, addr: u64) -> bool;
        fn yield_reservation(&mut self);
        fn flush_tlb(&mut self, scope: FlushScope);
    }
}

/// A memory mock that serves `words` as the program at `base`.
pub fn program_memory(base: u64, words: &'static [u32]) -> MockMemory {
    let mut memory = MockMemory::new();
    let _ = memory
        .expect_load()
        .withf(|_, size, kind| *size == 2 && *kind == AccessType::Fetch)
        .returning(move |addr, _, _| {
            let offset = addr.wrapping_sub(base) as usize;
            let word = words.get(offset / 4).copied().unwrap_or(0);
            Ok(u64::from((word >> (16 * ((offset / 2) % 2))) & 0xffff))
        });
    memory
}
