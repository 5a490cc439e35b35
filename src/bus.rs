//! Bus transmitter contract and spi adapters

use embedded_hal as hal;

use hal::blocking::spi::Write;
use hal::spi::FullDuplex;

use nb::block;

/// Sends a rendered frame, in order, exactly once
///
/// Clock rate and spi mode are set up before the bus is handed to the
/// device and are not touched per frame. Bus level timeouts are reported
/// through `Error`.
pub trait Transmit {
    type Error;

    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Transmit + ?Sized> Transmit for &mut T {
    type Error = T::Error;

    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        (**self).transmit(frame)
    }
}

/// Frame in one blocking spi write
pub struct BlockingBus<SPI> {
    spi: SPI,
}

impl<SPI, E> BlockingBus<SPI>
where
    SPI: Write<u8, Error = E>,
{
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> Transmit for BlockingBus<SPI>
where
    SPI: Write<u8, Error = E>,
{
    type Error = E;

    fn transmit(&mut self, frame: &[u8]) -> Result<(), E> {
        self.spi.write(frame)
    }
}

/// Frame pushed byte by byte through a full duplex spi
///
/// Please ensure that the mcu is fast enough to keep the fifo fed, a gap
/// between two bytes stretches a symbol and corrupts the frame.
pub struct FullDuplexBus<SPI> {
    spi: SPI,
}

impl<SPI, E> FullDuplexBus<SPI>
where
    SPI: FullDuplex<u8, Error = E>,
{
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> Transmit for FullDuplexBus<SPI>
where
    SPI: FullDuplex<u8, Error = E>,
{
    type Error = E;

    fn transmit(&mut self, frame: &[u8]) -> Result<(), E> {
        // We introduce an offset in the fifo here, so there's always one byte in transit
        // Some MCUs (like the stm32f1) only a one byte fifo, which would result
        // in overrun error if two bytes need to be stored
        block!(self.spi.send(0))?;
        for &byte in frame {
            block!(self.spi.send(byte))?;
            block!(self.spi.read()).ok();
        }
        // Now, resolve the offset we introduced at the beginning
        block!(self.spi.read())?;
        Ok(())
    }
}
