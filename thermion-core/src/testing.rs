//! In-memory board for unit tests

use core::convert::Infallible;

use heapless::{Deque, Vec};

use thermion_hal::{
    AnalogInput, Clock, DigitalOutput, Level, NvStorage, PinId, PinMode, PortError, PwmOutput,
    SerialPort, StorageError,
};

const ADC_PIN: PinId = 26;
const PWM_PIN: PinId = 6;
const OUTPUT_PINS: [PinId; 3] = [6, 7, 8];
const STORAGE_SIZE: usize = 1024;

/// RAM-backed storage, initially erased (0xFF)
pub struct MemStorage {
    pub data: [u8; STORAGE_SIZE],
    /// Make every access fail
    pub fail: bool,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            data: [0xFF; STORAGE_SIZE],
            fail: false,
        }
    }

    fn range(&self, offset: u32, len: usize) -> Result<core::ops::Range<usize>, StorageError> {
        if self.fail {
            return Err(StorageError::Device);
        }
        let start = offset as usize;
        let end = start + len;
        if end > STORAGE_SIZE {
            return Err(StorageError::OutOfBounds);
        }
        Ok(start..end)
    }
}

impl NvStorage for MemStorage {
    fn capacity(&self) -> usize {
        STORAGE_SIZE
    }

    fn get(&mut self, offset: u32, buffer: &mut [u8]) -> Result<(), StorageError> {
        let range = self.range(offset, buffer.len())?;
        buffer.copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn put(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError> {
        let range = self.range(offset, data.len())?;
        self.data[range].copy_from_slice(data);
        Ok(())
    }
}

/// Board with the default pin map, scripted serial input and a manual clock
pub struct MockBoard {
    /// Value returned by the ADC pin
    pub adc: u16,
    /// Make ADC reads fail
    pub adc_fail: bool,
    /// Last PWM duty written
    pub pwm: Option<u8>,
    /// Current time
    pub now_ms: u64,
    pub storage: MemStorage,
    levels: [Option<Level>; 32],
    modes: [Option<PinMode>; 32],
    rx: Deque<u8, 256>,
    tx: Vec<u8, 16384>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            adc: 512,
            adc_fail: false,
            pwm: None,
            now_ms: 0,
            storage: MemStorage::new(),
            levels: [None; 32],
            modes: [None; 32],
            rx: Deque::new(),
            tx: Vec::new(),
        }
    }

    /// Queue bytes as if received over the serial line
    pub fn push_input(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.rx.push_back(b).unwrap();
        }
    }

    /// Everything written to the serial line so far
    pub fn output(&self) -> &str {
        core::str::from_utf8(&self.tx).unwrap()
    }

    pub fn clear_output(&mut self) {
        self.tx.clear();
    }

    pub fn level(&self, pin: PinId) -> Option<Level> {
        self.levels.get(pin as usize).copied().flatten()
    }

    pub fn is_output(&self, pin: PinId) -> bool {
        self.modes.get(pin as usize).copied().flatten() == Some(PinMode::Output)
    }

    fn check_output(pin: PinId) -> Result<usize, PortError> {
        if OUTPUT_PINS.contains(&pin) {
            Ok(pin as usize)
        } else {
            Err(PortError::UnknownPin(pin))
        }
    }
}

impl AnalogInput for MockBoard {
    fn analog_read(&mut self, pin: PinId) -> Result<u16, PortError> {
        if pin != ADC_PIN {
            return Err(PortError::UnknownPin(pin));
        }
        if self.adc_fail {
            return Err(PortError::Hardware);
        }
        Ok(self.adc)
    }
}

impl DigitalOutput for MockBoard {
    fn pin_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), PortError> {
        let idx = Self::check_output(pin)?;
        self.modes[idx] = Some(mode);
        Ok(())
    }

    fn digital_write(&mut self, pin: PinId, level: Level) -> Result<(), PortError> {
        let idx = Self::check_output(pin)?;
        self.levels[idx] = Some(level);
        Ok(())
    }
}

impl PwmOutput for MockBoard {
    fn pwm_write(&mut self, pin: PinId, duty: u8) -> Result<(), PortError> {
        if pin != PWM_PIN {
            return Err(PortError::UnknownPin(pin));
        }
        self.pwm = Some(duty);
        Ok(())
    }
}

impl SerialPort for MockBoard {
    type Error = Infallible;

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx.extend_from_slice(data).unwrap();
        Ok(())
    }
}

impl NvStorage for MockBoard {
    fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    fn get(&mut self, offset: u32, buffer: &mut [u8]) -> Result<(), StorageError> {
        self.storage.get(offset, buffer)
    }

    fn put(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError> {
        self.storage.put(offset, data)
    }
}

impl Clock for MockBoard {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}
