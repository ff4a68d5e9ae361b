// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use std::io;

use super::{
    Binary, ClockIdentity, ClockQuality, ConstPackedSizeBytes, PortAddress, PortIdentity, PtpText,
    ReadBytes, ReadFromBytes, TimeInterval, Timestamp, WriteBytes, WriteToBytes,
};

// Size implementations.

impl ConstPackedSizeBytes for ClockIdentity {
    const PACKED_SIZE_BYTES: usize = 8;
}

impl ConstPackedSizeBytes for PortIdentity {
    const PACKED_SIZE_BYTES: usize = ClockIdentity::PACKED_SIZE_BYTES + 2;
}

impl ConstPackedSizeBytes for ClockQuality {
    const PACKED_SIZE_BYTES: usize = 4;
}

impl ConstPackedSizeBytes for Timestamp {
    const PACKED_SIZE_BYTES: usize = 10;
}

impl ConstPackedSizeBytes for TimeInterval {
    const PACKED_SIZE_BYTES: usize = 8;
}

// Writer implementations.

impl WriteToBytes for ClockIdentity {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.0)
    }
}

impl WriteToBytes for PortIdentity {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_bytes(self.clock_identity)?;
        writer.write_u16::<BE>(self.port_number)?;
        Ok(())
    }
}

impl WriteToBytes for ClockQuality {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u8(self.clock_class)?;
        writer.write_u8(self.clock_accuracy)?;
        writer.write_u16::<BE>(self.offset_scaled_log_variance)?;
        Ok(())
    }
}

impl WriteToBytes for PtpText {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        let bytes = self.0.as_bytes();
        if bytes.len() > PtpText::MAX_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "PTP text longer than 255 bytes",
            ));
        }
        writer.write_u8(bytes.len() as u8)?;
        writer.write_all(bytes)?;
        Ok(())
    }
}

impl WriteToBytes for Timestamp {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        if self.seconds > Timestamp::MAX_SECONDS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "timestamp seconds exceed 48 bits",
            ));
        }
        writer.write_uint::<BE>(self.seconds, 6)?;
        writer.write_u32::<BE>(self.nanoseconds)?;
        Ok(())
    }
}

impl WriteToBytes for TimeInterval {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_i64::<BE>(self.0)
    }
}

/// Binary values travel with a 16-bit length prefix.
impl WriteToBytes for Binary {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        if self.len() > u16::MAX as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "binary longer than 65535 bytes",
            ));
        }
        writer.write_u16::<BE>(self.len() as u16)?;
        writer.write_all(self.as_slice())?;
        Ok(())
    }
}

impl WriteToBytes for PortAddress {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<BE>(self.network_protocol)?;
        writer.write_bytes(&self.address)?;
        Ok(())
    }
}

// Reader implementations.

impl ReadFromBytes for ClockIdentity {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let mut id = [0u8; 8];
        reader.read_exact(&mut id)?;
        Ok(ClockIdentity(id))
    }
}

impl ReadFromBytes for PortIdentity {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let clock_identity = reader.read_bytes::<ClockIdentity>()?;
        let port_number = reader.read_u16::<BE>()?;
        Ok(PortIdentity {
            clock_identity,
            port_number,
        })
    }
}

impl ReadFromBytes for ClockQuality {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let clock_class = reader.read_u8()?;
        let clock_accuracy = reader.read_u8()?;
        let offset_scaled_log_variance = reader.read_u16::<BE>()?;
        Ok(ClockQuality {
            clock_class,
            clock_accuracy,
            offset_scaled_log_variance,
        })
    }
}

impl ReadFromBytes for PtpText {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let len = reader.read_u8()? as usize;
        let mut text = vec![0u8; len];
        reader.read_exact(&mut text)?;
        Ok(PtpText(String::from_utf8_lossy(&text).into_owned()))
    }
}

impl ReadFromBytes for Timestamp {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let seconds = reader.read_uint::<BE>(6)?;
        let nanoseconds = reader.read_u32::<BE>()?;
        Ok(Timestamp {
            seconds,
            nanoseconds,
        })
    }
}

impl ReadFromBytes for TimeInterval {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        Ok(TimeInterval(reader.read_i64::<BE>()?))
    }
}

impl ReadFromBytes for Binary {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let len = reader.read_u16::<BE>()? as usize;
        let mut bytes = vec![0u8; len];
        reader.read_exact(&mut bytes)?;
        Ok(Binary::from(bytes))
    }
}

impl ReadFromBytes for PortAddress {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let network_protocol = reader.read_u16::<BE>()?;
        let address = reader.read_bytes::<Binary>()?;
        Ok(PortAddress {
            network_protocol,
            address,
        })
    }
}
