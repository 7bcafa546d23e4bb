use std::cell::RefCell;
use std::rc::Rc;

use rviss_core::common::{AccessType, Trap};
use rviss_core::core::cpu::StepStatus;
use rviss_core::soc::{FlatMemory, FlushScope, Memory, TraceSink};
use rviss_core::{Config, Cpu, ExtensionRegistry};

/// Base address of the test RAM and of every loaded program.
pub const RAM_BASE: u64 = 0x8000_0000;

/// Scratch data area inside the test RAM.
pub const DATA: u64 = RAM_BASE + 0x1000;

/// RAM the test keeps a handle to after the hart takes ownership.
#[derive(Clone, Debug)]
pub struct SharedMemory(pub Rc<RefCell<FlatMemory>>);

impl Memory for SharedMemory {
    fn load(&mut self, addr: u64, size: usize, kind: AccessType) -> Result<u64, Trap> {
        self.0.borrow_mut().load(addr, size, kind)
    }

    fn store(&mut self, addr: u64, size: usize, value: u64) -> Result<(), Trap> {
        self.0.borrow_mut().store(addr, size, value)
    }

    fn reserve(&mut self, addr: u64) {
        self.0.borrow_mut().reserve(addr);
    }

    fn check_reservation(&self, addr: u64) -> bool {
        self.0.borrow().check_reservation(addr)
    }

    fn yield_reservation(&mut self) {
        self.0.borrow_mut().yield_reservation();
    }

    fn flush_tlb(&mut self, scope: FlushScope) {
        self.0.borrow_mut().flush_tlb(scope);
    }
}

pub struct TestContext {
    pub cpu: Cpu,
    pub ram: Rc<RefCell<FlatMemory>>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// A hart with the default configuration and the builtin extensions.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// A hart with the given ISA string and full privilege levels.
    pub fn with_isa(isa: &str) -> Self {
        let mut config = Config::default();
        config.isa.isa = isa.to_string();
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_registry(config, standard_registry())
    }

    pub fn with_registry(config: Config, registry: ExtensionRegistry) -> Self {
        init_tracing();
        let ram = Rc::new(RefCell::new(FlatMemory::new(RAM_BASE, 0x10_0000)));
        let cpu = Cpu::new(&config, registry, Box::new(SharedMemory(Rc::clone(&ram))))
            .expect("test configuration must build a hart");
        Self { cpu, ram }
    }

    /// Writes 32-bit instruction words at `RAM_BASE` and points the PC at them.
    pub fn load_program(mut self, instructions: &[u32]) -> Self {
        self.ram.borrow_mut().write_words(RAM_BASE, instructions);
        self.cpu.state.pc = RAM_BASE;
        self
    }

    /// Writes 16-bit parcels at `RAM_BASE` and points the PC at them.
    pub fn load_parcels(mut self, parcels: &[u16]) -> Self {
        let bytes: Vec<u8> = parcels.iter().flat_map(|p| p.to_le_bytes()).collect();
        self.ram.borrow_mut().write_bytes(RAM_BASE, &bytes);
        self.cpu.state.pc = RAM_BASE;
        self
    }

    /// Installs a trace collaborator.
    pub fn with_tracer(self, tracer: Box<dyn TraceSink>) -> Self {
        Self {
            cpu: self.cpu.with_tracer(tracer),
            ram: self.ram,
        }
    }

    pub fn set_reg(&mut self, reg: usize, val: u64) {
        self.cpu.set_x(reg, val);
    }

    pub fn get_reg(&self, reg: usize) -> u64 {
        self.cpu.x(reg)
    }

    /// Steps once and returns the status.
    pub fn step(&mut self) -> StepStatus {
        self.cpu.step()
    }

    /// Steps `n` times, failing the test on anything but a retirement.
    pub fn retire(&mut self, n: usize) {
        for i in 0..n {
            let pc = self.cpu.pc();
            let status = self.cpu.step();
            assert_eq!(status, StepStatus::Retired, "step {i} at {pc:#x}");
        }
    }

    /// Writes 32-bit words into RAM.
    pub fn write_u32s(&self, addr: u64, words: &[u32]) {
        self.ram.borrow_mut().write_words(addr, words);
    }

    pub fn read_u32(&self, addr: u64) -> u32 {
        let bytes = self.ram.borrow().read_bytes(addr, 4);
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Copies `bytes` into vector register `reg`.
    pub fn set_vreg(&mut self, reg: usize, bytes: &[u8]) {
        self.cpu.state.regs.vregs_mut().reg_mut(reg)[..bytes.len()].copy_from_slice(bytes);
    }

    pub fn vreg(&self, reg: usize) -> Vec<u8> {
        self.cpu.state.regs.vregs().reg(reg).to_vec()
    }

    /// Element `idx` of vector register group `reg` at SEW 32.
    pub fn velem32(&self, reg: usize, idx: usize) -> u32 {
        self.cpu.state.regs.vregs().elem(reg, idx, 32) as u32
    }

    pub fn set_velems32(&mut self, reg: usize, values: &[u32]) {
        let vregs = self.cpu.state.regs.vregs_mut();
        for (i, v) in values.iter().enumerate() {
            vregs.set_elem(reg, i, 32, u64::from(*v));
        }
    }
}

/// The builtin registry.
pub fn standard_registry() -> ExtensionRegistry {
    ExtensionRegistry::standard().expect("builtin extensions register cleanly")
}

/// Routes `tracing` output through the test writer once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parses a hex string into bytes.
pub fn hex(text: &str) -> Vec<u8> {
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).expect("valid hex"))
        .collect()
}
