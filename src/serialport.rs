use crate::protocol::{BmsReading, RequestFrame, POLL_DELAY};
use crate::Error;
use std::io::{Read, Write};
use std::time::{Duration, Instant};

/// Upper bound for a single read-all response, with headroom for packs
/// reporting the maximum cell count.
const RESPONSE_READ_LIMIT: usize = 300;

/// Synchronous JK BMS client over a serial port.
///
/// The device is half-duplex: one request is written, then the response is
/// read back before the next poll may start. A timed-out or short read is
/// not an error here; the decoder's length guard turns it into an
/// all-absent reading.
pub struct JkBms {
    serial: Box<dyn serialport::SerialPort>,
    last_poll: Instant,
    delay: Duration,
}

impl JkBms {
    pub fn new(port: &str, baud_rate: u32) -> Result<Self, Error> {
        Ok(Self {
            serial: serialport::new(port, baud_rate)
                .data_bits(serialport::DataBits::Eight)
                .parity(serialport::Parity::None)
                .stop_bits(serialport::StopBits::One)
                .flow_control(serialport::FlowControl::None)
                .open()?,
            last_poll: Instant::now(),
            delay: POLL_DELAY,
        })
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> Result<(), Error> {
        self.serial.set_timeout(timeout).map_err(Into::into)
    }

    /// Sets the minimum pause between consecutive poll cycles.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    fn await_poll_delay(&self) {
        let since_last_poll = Instant::now().duration_since(self.last_poll);
        if let Some(remaining) = self.delay.checked_sub(since_last_poll) {
            std::thread::sleep(remaining);
        }
    }

    fn send_frame(&mut self, frame: &RequestFrame) -> Result<(), Error> {
        // Clear all incoming serial to avoid data collision
        loop {
            let pending = self.serial.bytes_to_read()?;
            if pending == 0 {
                break;
            }
            log::trace!("Got {} pending bytes", pending);
            let mut buf: Vec<u8> = vec![0; 64];
            let received = self.serial.read(buf.as_mut_slice())?;
            log::trace!("Read {} pending bytes", received);
        }
        self.await_poll_delay();

        log::trace!("send_frame: {:02X?}", **frame);
        self.serial.write_all(&**frame)?;
        Ok(())
    }

    /// Reads the response, accumulating chunks until the device stops
    /// sending. A timeout with no data simply ends the read.
    fn receive_response(&mut self) -> Result<Vec<u8>, Error> {
        let mut response = Vec::with_capacity(RESPONSE_READ_LIMIT);
        let mut chunk = [0u8; 64];
        while response.len() < RESPONSE_READ_LIMIT {
            match self.serial.read(&mut chunk) {
                Ok(0) => break,
                Ok(received) => response.extend_from_slice(&chunk[..received]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        self.last_poll = Instant::now();

        log::trace!("receive_response: {} bytes {:02X?}", response.len(), response);
        Ok(response)
    }

    /// One full poll cycle: send the read-all frame and decode whatever
    /// comes back.
    pub fn read_all(&mut self) -> Result<BmsReading, Error> {
        self.send_frame(&RequestFrame::read_all())?;
        let response = self.receive_response()?;
        Ok(BmsReading::decode(&response))
    }
}
