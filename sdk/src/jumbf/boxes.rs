// Copyright 2025 The c2pa-lineage Authors. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Reading and writing the JUMBF boxes that make up a C2PA manifest store.
//!
//! Every box starts with a big-endian `u32` size and a four-character type.
//! A size of 1 means a `u64` extended size follows the type. The reader never
//! trusts a declared size: each box must fit inside its parent and must be at
//! least as large as its own header.
//!
//! # References
//!
//! - [JPEG universal metadata box format](https://www.iso.org/standard/73604.html)
//! - [C2PA box details](https://c2pa.org/specifications/specifications/2.1/specs/C2PA_Specification.html#_c2pa_box_details)

use std::{
    any::Any,
    fmt,
    io::{Cursor, Read, Result as IoResult, Seek, SeekFrom, Write},
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use hex::FromHex;
use log::debug;
use thiserror::Error;

/// `JumbfParseError` enumerates errors detected while parsing JUMBF data structures.
#[derive(Debug, Error)]
pub enum JumbfParseError {
    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("invalid box header")]
    InvalidBoxHeader,

    /// A declared box size is zero, smaller than its header, or reaches past
    /// its parent.
    #[error("box of {size} bytes at offset {offset} does not fit in its parent")]
    InvalidBoxRange { offset: u64, size: u64 },

    #[error("invalid JUMBF header")]
    InvalidJumbfHeader,

    #[error("expected JUMD")]
    ExpectedJumdError,

    /// The description box lacks the requestable and label toggles or its
    /// fields do not fill the box exactly.
    #[error("invalid JUMD box")]
    InvalidDescriptionBox,

    #[error("box label is not valid UTF-8")]
    InvalidLabel,

    #[error("assertion salt must be 16 bytes or greater")]
    InvalidSalt,

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// A specialized `JumbfParseResult` type for JUMBF parsing operations.
pub type JumbfParseResult<T> = std::result::Result<T, JumbfParseError>;

const HEADER_SIZE: u64 = 8;
const LARGE_HEADER_SIZE: u64 = 16;
const UUID_SIZE: u64 = 16;
const SIGNATURE_SIZE: u64 = 32;

// jumd toggles
const TOGGLE_REQUESTABLE: u8 = 0x01;
const TOGGLE_LABEL: u8 = 0x02;
const TOGGLE_ID: u8 = 0x04;
const TOGGLE_SIGNATURE: u8 = 0x08;
const TOGGLE_PRIVATE: u8 = 0x10;

/// ISO BMFF box.
pub trait BMFFBox: Any + Send + Sync {
    /// Box type code.
    fn box_type(&self) -> [u8; 4];

    /// Box size, header included.
    fn box_size(&self) -> IoResult<u32> {
        let size = HEADER_SIZE as usize + self.box_payload_size()?;
        u32::try_from(size).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "box too large")
        })
    }

    /// Payload size of the box.
    fn box_payload_size(&self) -> IoResult<usize>;

    /// Writes the box to the given writer.
    fn write_box(&self, writer: &mut dyn Write) -> IoResult<()> {
        writer.write_u32::<BigEndian>(self.box_size()?)?;
        writer.write_all(&self.box_type())?;
        self.write_box_payload(writer)
    }

    /// Writes the payload of the box to the given writer.
    fn write_box_payload(&self, writer: &mut dyn Write) -> IoResult<()>;

    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn BMFFBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BMFFBox")
            .field("type", &String::from_utf8_lossy(&self.box_type()))
            .field("size", &self.box_size().ok())
            .finish()
    }
}

// ANCHOR C2PA UUIDs
pub const CAI_BLOCK_UUID: &str = "6332706100110010800000AA00389B71"; // c2pa
pub const CAI_STORE_UUID: &str = "63326D6100110010800000AA00389B71"; // c2ma
pub const CAI_ASSERTION_STORE_UUID: &str = "6332617300110010800000AA00389B71"; // c2as
pub const CAI_CLAIM_UUID: &str = "6332636C00110010800000AA00389B71"; // c2cl
pub const CAI_SIGNATURE_UUID: &str = "6332637300110010800000AA00389B71"; // c2cs
pub const CAI_JSON_ASSERTION_UUID: &str = "6A736F6E00110010800000AA00389B71"; // json
pub const CAI_CBOR_ASSERTION_UUID: &str = "63626F7200110010800000AA00389B71"; // cbor
pub const CAI_EMBEDDED_FILE_UUID: &str = "40CB0C32BB8A489DA70B2AD6F47F4369"; // embedded file

// ANCHOR JUMBF superbox
/// JUMBF superbox (ISO 19566-5:2019, Annex A)
#[derive(Debug)]
pub struct JUMBFSuperBox {
    desc_box: JUMBFDescriptionBox,
    data_boxes: Vec<Box<dyn BMFFBox>>,
}

impl JUMBFSuperBox {
    pub fn new(box_label: &str, a_type: Option<&str>) -> Self {
        JUMBFSuperBox {
            desc_box: JUMBFDescriptionBox::new(box_label, a_type),
            data_boxes: vec![],
        }
    }

    pub fn from(desc_box: JUMBFDescriptionBox) -> Self {
        JUMBFSuperBox {
            desc_box,
            data_boxes: vec![],
        }
    }

    pub fn add_data_box(&mut self, b: Box<dyn BMFFBox>) {
        self.data_boxes.push(b)
    }

    pub fn desc_box(&self) -> &JUMBFDescriptionBox {
        &self.desc_box
    }

    pub fn data_box_count(&self) -> usize {
        self.data_boxes.len()
    }

    pub fn data_box(&self, index: usize) -> Option<&dyn BMFFBox> {
        self.data_boxes.get(index).map(|b| b.as_ref())
    }

    /// Iterates over the data boxes in order.
    pub fn data_boxes(&self) -> impl Iterator<Item = &dyn BMFFBox> {
        self.data_boxes.iter().map(|b| b.as_ref())
    }

    /// Iterates over the child superboxes, skipping content boxes.
    pub fn child_superboxes(&self) -> impl Iterator<Item = &JUMBFSuperBox> {
        self.data_boxes()
            .filter_map(|b| b.as_any().downcast_ref::<JUMBFSuperBox>())
    }

    pub fn data_box_as_superbox(&self, index: usize) -> Option<&JUMBFSuperBox> {
        self.data_box(index)?.as_any().downcast_ref::<JUMBFSuperBox>()
    }

    pub fn data_box_as_json_box(&self, index: usize) -> Option<&JUMBFJSONContentBox> {
        self.data_box(index)?
            .as_any()
            .downcast_ref::<JUMBFJSONContentBox>()
    }

    pub fn data_box_as_cbor_box(&self, index: usize) -> Option<&JUMBFCBORContentBox> {
        self.data_box(index)?
            .as_any()
            .downcast_ref::<JUMBFCBORContentBox>()
    }

    /// Returns the first content box that is neither a superbox nor padding.
    pub fn content_box(&self) -> Option<&dyn BMFFBox> {
        self.data_boxes().find(|b| {
            let any = b.as_any();
            !any.is::<JUMBFSuperBox>() && !any.is::<JUMBFPaddingContentBox>()
        })
    }
}

impl BMFFBox for JUMBFSuperBox {
    fn box_type(&self) -> [u8; 4] {
        *b"jumb"
    }

    fn box_payload_size(&self) -> IoResult<usize> {
        let mut size = self.desc_box.box_size()? as usize;
        for b in &self.data_boxes {
            size += b.box_size()? as usize;
        }
        Ok(size)
    }

    fn write_box_payload(&self, writer: &mut dyn Write) -> IoResult<()> {
        self.desc_box.write_box(writer)?;
        for b in &self.data_boxes {
            b.write_box(writer)?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ANCHOR JUMBF Description box
/// JUMBF Description box (ISO 19566-5:2019, Annex A)
#[derive(Debug)]
pub struct JUMBFDescriptionBox {
    box_uuid: [u8; 16],
    toggles: u8,
    label: String,
    box_id: Option<u32>,
    signature: Option<[u8; 32]>,
    private: Option<CAISaltContentBox>,
}

impl JUMBFDescriptionBox {
    /// Makes a new requestable, labelled `JUMBFDescriptionBox`.
    ///
    /// `a_type` is the hex UUID of the box content type.
    pub fn new(box_label: &str, a_type: Option<&str>) -> Self {
        JUMBFDescriptionBox {
            box_uuid: a_type
                .and_then(|t| <[u8; 16]>::from_hex(t).ok())
                .unwrap_or([0u8; 16]),
            toggles: TOGGLE_REQUESTABLE | TOGGLE_LABEL,
            label: box_label.trim_end_matches('\0').to_string(),
            box_id: None,
            signature: None,
            private: None,
        }
    }

    pub fn set_salt(&mut self, salt: Vec<u8>) -> JumbfParseResult<()> {
        if salt.len() < 16 {
            return Err(JumbfParseError::InvalidSalt);
        }

        self.private = Some(CAISaltContentBox::new(salt));
        self.toggles |= TOGGLE_PRIVATE;

        Ok(())
    }

    pub fn get_salt(&self) -> Option<&[u8]> {
        self.private.as_ref().map(|saltbox| saltbox.salt.as_slice())
    }

    /// Upper-case hex form of the content type UUID.
    pub fn uuid(&self) -> String {
        hex::encode_upper(self.box_uuid)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn toggles(&self) -> u8 {
        self.toggles
    }

    pub fn box_id(&self) -> Option<u32> {
        self.box_id
    }

    pub fn signature(&self) -> Option<&[u8; 32]> {
        self.signature.as_ref()
    }
}

impl BMFFBox for JUMBFDescriptionBox {
    fn box_type(&self) -> [u8; 4] {
        *b"jumd"
    }

    fn box_payload_size(&self) -> IoResult<usize> {
        let mut size = UUID_SIZE as usize + 1 + self.label.len() + 1;
        if self.box_id.is_some() {
            size += 4;
        }
        if self.signature.is_some() {
            size += SIGNATURE_SIZE as usize;
        }
        if let Some(salt) = &self.private {
            size += salt.box_size()? as usize;
        }
        Ok(size)
    }

    fn write_box_payload(&self, writer: &mut dyn Write) -> IoResult<()> {
        writer.write_all(&self.box_uuid)?;
        writer.write_u8(self.toggles)?;
        writer.write_all(self.label.as_bytes())?;
        writer.write_u8(0)?;

        if let Some(id) = self.box_id {
            writer.write_u32::<BigEndian>(id)?;
        }

        if let Some(sig) = &self.signature {
            writer.write_all(sig)?;
        }

        if let Some(salt) = &self.private {
            salt.write_box(writer)?;
        }

        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ANCHOR JSON Content box
/// JSON content box.
#[derive(Debug)]
pub struct JUMBFJSONContentBox {
    json: Vec<u8>,
}

impl JUMBFJSONContentBox {
    pub fn new(json: Vec<u8>) -> Self {
        JUMBFJSONContentBox { json }
    }

    pub fn json(&self) -> &[u8] {
        &self.json
    }
}

impl BMFFBox for JUMBFJSONContentBox {
    fn box_type(&self) -> [u8; 4] {
        *b"json"
    }

    fn box_payload_size(&self) -> IoResult<usize> {
        Ok(self.json.len())
    }

    fn write_box_payload(&self, writer: &mut dyn Write) -> IoResult<()> {
        writer.write_all(&self.json)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ANCHOR CBOR Content box
/// CBOR content box.
#[derive(Debug)]
pub struct JUMBFCBORContentBox {
    cbor: Vec<u8>,
}

impl JUMBFCBORContentBox {
    pub fn new(cbor: Vec<u8>) -> Self {
        JUMBFCBORContentBox { cbor }
    }

    pub fn cbor(&self) -> &[u8] {
        &self.cbor
    }
}

impl BMFFBox for JUMBFCBORContentBox {
    fn box_type(&self) -> [u8; 4] {
        *b"cbor"
    }

    fn box_payload_size(&self) -> IoResult<usize> {
        Ok(self.cbor.len())
    }

    fn write_box_payload(&self, writer: &mut dyn Write) -> IoResult<()> {
        writer.write_all(&self.cbor)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ANCHOR Padding box
/// Padding (`free`) box. Contents are ignored by readers.
#[derive(Debug)]
pub struct JUMBFPaddingContentBox {
    padding: Vec<u8>,
}

impl JUMBFPaddingContentBox {
    pub fn new(padding_size: usize) -> Self {
        JUMBFPaddingContentBox {
            padding: vec![0; padding_size],
        }
    }

    pub fn new_with_vec(padding: Vec<u8>) -> Self {
        JUMBFPaddingContentBox { padding }
    }
}

impl BMFFBox for JUMBFPaddingContentBox {
    fn box_type(&self) -> [u8; 4] {
        *b"free"
    }

    fn box_payload_size(&self) -> IoResult<usize> {
        Ok(self.padding.len())
    }

    fn write_box_payload(&self, writer: &mut dyn Write) -> IoResult<()> {
        writer.write_all(&self.padding)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ANCHOR Salt box
/// Private `c2sh` salt box carried in a description box.
#[derive(Debug)]
pub struct CAISaltContentBox {
    salt: Vec<u8>,
}

impl CAISaltContentBox {
    pub fn new(salt: Vec<u8>) -> Self {
        CAISaltContentBox { salt }
    }
}

impl BMFFBox for CAISaltContentBox {
    fn box_type(&self) -> [u8; 4] {
        *b"c2sh"
    }

    fn box_payload_size(&self) -> IoResult<usize> {
        Ok(self.salt.len())
    }

    fn write_box_payload(&self, writer: &mut dyn Write) -> IoResult<()> {
        writer.write_all(&self.salt)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ANCHOR Unknown box
/// A content box of a type this crate does not interpret.
///
/// The payload is kept byte-for-byte so that it can be hashed and written
/// back unchanged.
#[derive(Debug)]
pub struct JUMBFUnknownContentBox {
    box_type: [u8; 4],
    data: Vec<u8>,
}

impl JUMBFUnknownContentBox {
    pub fn new(box_type: [u8; 4], data: Vec<u8>) -> Self {
        JUMBFUnknownContentBox { box_type, data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl BMFFBox for JUMBFUnknownContentBox {
    fn box_type(&self) -> [u8; 4] {
        self.box_type
    }

    fn box_payload_size(&self) -> IoResult<usize> {
        Ok(self.data.len())
    }

    fn write_box_payload(&self, writer: &mut dyn Write) -> IoResult<()> {
        writer.write_all(&self.data)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//---------------
// SECTION Box Reader
//---------------

/// macro for dealing with the type of a BMFF/JUMBF box
macro_rules! boxtype {
    ($( $name:ident => $value:expr ),*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum BoxType {
            $( $name, )*
            UnknownBox(u32),
        }

        impl From<u32> for BoxType {
            fn from(t: u32) -> BoxType {
                match t {
                    $( $value => BoxType::$name, )*
                    _ => BoxType::UnknownBox(t),
                }
            }
        }
    }
}

boxtype! {
    Jumb => 0x6A75_6D62,
    Jumd => 0x6A75_6D64,
    Padding => 0x6672_6565,
    SaltHash => 0x6332_7368,
    Json => 0x6A73_6F6E,
    Cbor => 0x6362_6F72
}

/// Header of a box: its type, total size, and the length of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxHeader {
    pub name: BoxType,
    pub fourcc: [u8; 4],
    pub size: u64,
    pub header_size: u64,
}

impl BoxHeader {
    pub fn payload_size(&self) -> u64 {
        self.size - self.header_size
    }
}

fn current_pos<S: Seek>(seeker: &mut S) -> JumbfParseResult<u64> {
    Ok(seeker.stream_position()?)
}

fn read_vec<R: Read>(reader: &mut R, len: u64) -> JumbfParseResult<Vec<u8>> {
    let len = usize::try_from(len).map_err(|_| JumbfParseError::UnexpectedEof)?;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).map_err(eof)?;
    Ok(buf)
}

fn eof(err: std::io::Error) -> JumbfParseError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        JumbfParseError::UnexpectedEof
    } else {
        JumbfParseError::IoError(err)
    }
}

/// Bounds-checked reader for BMFF/JUMBF boxes.
pub struct BoxReader {}

impl BoxReader {
    /// Reads a box header.
    ///
    /// Returns `Ok(None)` at a clean end of data.
    pub fn read_header<R: Read>(reader: &mut R) -> JumbfParseResult<Option<BoxHeader>> {
        let mut buf = [0u8; 8];
        let mut filled = 0;
        while filled < buf.len() {
            let n = reader.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        match filled {
            0 => return Ok(None),
            8 => {}
            _ => return Err(JumbfParseError::UnexpectedEof),
        }

        let size = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let fourcc = [buf[4], buf[5], buf[6], buf[7]];
        let name = BoxType::from(u32::from_be_bytes(fourcc));

        let (size, header_size) = if size == 1 {
            let large_size = reader.read_u64::<BigEndian>().map_err(eof)?;
            (large_size, LARGE_HEADER_SIZE)
        } else {
            (size as u64, HEADER_SIZE)
        };

        Ok(Some(BoxHeader {
            name,
            fourcc,
            size,
            header_size,
        }))
    }

    /// Reads a header and checks that the box lies within `[pos, limit)`.
    fn read_bounded_header<R: Read + Seek>(
        reader: &mut R,
        limit: u64,
    ) -> JumbfParseResult<Option<BoxHeader>> {
        let offset = current_pos(reader)?;
        if offset >= limit {
            return Ok(None);
        }

        let header = BoxReader::read_header(reader)?.ok_or(JumbfParseError::UnexpectedEof)?;

        if header.size == 0
            || header.size < header.header_size
            || offset
                .checked_add(header.size)
                .map_or(true, |end| end > limit)
        {
            return Err(JumbfParseError::InvalidBoxRange {
                offset,
                size: header.size,
            });
        }

        Ok(Some(header))
    }

    /// Reads the payload of a `jumd` box of `payload_size` bytes.
    pub fn read_desc_box<R: Read + Seek>(
        reader: &mut R,
        payload_size: u64,
    ) -> JumbfParseResult<JUMBFDescriptionBox> {
        if payload_size < UUID_SIZE + 1 {
            return Err(JumbfParseError::InvalidDescriptionBox);
        }
        let end = current_pos(reader)? + payload_size;

        let mut box_uuid = [0u8; 16];
        reader.read_exact(&mut box_uuid).map_err(eof)?;

        let toggles = reader.read_u8().map_err(eof)?;
        if toggles & (TOGGLE_REQUESTABLE | TOGGLE_LABEL) != (TOGGLE_REQUESTABLE | TOGGLE_LABEL) {
            return Err(JumbfParseError::InvalidDescriptionBox);
        }

        // label runs to the first NUL, which must lie inside the box
        let mut label = Vec::with_capacity(64);
        loop {
            if current_pos(reader)? >= end {
                return Err(JumbfParseError::InvalidDescriptionBox);
            }
            match reader.read_u8().map_err(eof)? {
                0 => break,
                b => label.push(b),
            }
        }
        let label = String::from_utf8(label).map_err(|_| JumbfParseError::InvalidLabel)?;

        let box_id = if toggles & TOGGLE_ID != 0 {
            Some(reader.read_u32::<BigEndian>().map_err(eof)?)
        } else {
            None
        };

        let signature = if toggles & TOGGLE_SIGNATURE != 0 {
            let mut sig = [0u8; 32];
            reader.read_exact(&mut sig).map_err(eof)?;
            Some(sig)
        } else {
            None
        };

        let private = if toggles & TOGGLE_PRIVATE != 0 {
            let header = BoxReader::read_bounded_header(reader, end)?
                .ok_or(JumbfParseError::InvalidDescriptionBox)?;
            if header.name != BoxType::SaltHash {
                return Err(JumbfParseError::InvalidDescriptionBox);
            }
            Some(CAISaltContentBox::new(read_vec(
                reader,
                header.payload_size(),
            )?))
        } else {
            None
        };

        // the fields must fill the box exactly
        if current_pos(reader)? != end {
            return Err(JumbfParseError::InvalidDescriptionBox);
        }

        Ok(JUMBFDescriptionBox {
            box_uuid,
            toggles,
            label,
            box_id,
            signature,
            private,
        })
    }

    /// Reads a `jumb` superbox that must end at or before `limit`.
    pub fn read_super_box<R: Read + Seek>(
        reader: &mut R,
        limit: u64,
    ) -> JumbfParseResult<JUMBFSuperBox> {
        let start_pos = current_pos(reader)?;

        let jumb_header = BoxReader::read_bounded_header(reader, limit)?
            .ok_or(JumbfParseError::UnexpectedEof)?;
        if jumb_header.name != BoxType::Jumb {
            return Err(JumbfParseError::InvalidJumbfHeader);
        }

        let dest_pos = start_pos + jumb_header.size;

        let jumd_header = BoxReader::read_bounded_header(reader, dest_pos)?
            .ok_or(JumbfParseError::ExpectedJumdError)?;
        if jumd_header.name != BoxType::Jumd {
            return Err(JumbfParseError::ExpectedJumdError);
        }

        let jdesc = BoxReader::read_desc_box(reader, jumd_header.payload_size())?;
        debug!("START#Label: {:?}", jdesc.label());

        let mut sbox = JUMBFSuperBox::from(jdesc);

        loop {
            let box_start = current_pos(reader)?;
            let Some(box_header) = BoxReader::read_bounded_header(reader, dest_pos)? else {
                break;
            };

            let next_box: Box<dyn BMFFBox> = match box_header.name {
                BoxType::Jumb => {
                    reader.seek(SeekFrom::Start(box_start))?;
                    Box::new(BoxReader::read_super_box(reader, dest_pos)?)
                }
                BoxType::Json => Box::new(JUMBFJSONContentBox::new(read_vec(
                    reader,
                    box_header.payload_size(),
                )?)),
                BoxType::Cbor => Box::new(JUMBFCBORContentBox::new(read_vec(
                    reader,
                    box_header.payload_size(),
                )?)),
                BoxType::Padding => Box::new(JUMBFPaddingContentBox::new_with_vec(read_vec(
                    reader,
                    box_header.payload_size(),
                )?)),
                _ => {
                    debug!(
                        "Unknown Boxtype: {:?}",
                        String::from_utf8_lossy(&box_header.fourcc)
                    );
                    Box::new(JUMBFUnknownContentBox::new(
                        box_header.fourcc,
                        read_vec(reader, box_header.payload_size())?,
                    ))
                }
            };
            sbox.add_data_box(next_box);
        }

        debug!("END#Label: {:?}", sbox.desc_box().label());

        Ok(sbox)
    }

    /// Reads the top-level superbox of `data`.
    ///
    /// Bytes after the superbox are ignored.
    pub fn read_jumbf(data: &[u8]) -> JumbfParseResult<JUMBFSuperBox> {
        let mut reader = Cursor::new(data);
        BoxReader::read_super_box(&mut reader, data.len() as u64)
    }
}

// !SECTION

/// Serializes a box to a new buffer.
pub fn to_bytes(b: &dyn BMFFBox) -> IoResult<Vec<u8>> {
    let mut out = Vec::with_capacity(b.box_size()? as usize);
    b.write_box(&mut out)?;
    Ok(out)
}
