// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor-driven binary decoder.
//!
//! The payload carries no field tags, so fields are read strictly in the
//! descriptor's order. Errors carry the path of the field being read
//! (`Order.Items[2].Name`).

use crate::codec::{BinaryDecoder, DecodeError, DecodeErrorKind};
use crate::config::{MAX_DECODE_DEPTH, MAX_ZERO_WIDTH_ARRAY_LEN};
use crate::dynamic::{
    DecodedInstance, DynamicValue, EnumDescriptor, FieldDescriptor, FieldType, PrimitiveKind,
    TypeDescriptor, TypeKind,
};

/// Decode one value of `descriptor` from `input`.
///
/// Consumes exactly the bytes the descriptor implies; on failure the input
/// position is unspecified.
pub fn decode<D: BinaryDecoder + ?Sized>(
    descriptor: &TypeDescriptor,
    input: &mut D,
) -> Result<DecodedInstance, DecodeError> {
    let value = decode_value(descriptor, input, 0).map_err(|e| e.within(&descriptor.name))?;
    Ok(DecodedInstance::new(descriptor, value))
}

fn decode_value<D: BinaryDecoder + ?Sized>(
    descriptor: &TypeDescriptor,
    input: &mut D,
    depth: usize,
) -> Result<DynamicValue, DecodeError> {
    if depth > MAX_DECODE_DEPTH {
        return Err(DecodeErrorKind::DepthExceeded.into());
    }
    match &descriptor.kind {
        TypeKind::Enum(e) => decode_enum(e, input),
        TypeKind::Struct(s) => {
            let mut fields = Vec::with_capacity(s.fields().len());
            for field in s.fields() {
                let value = decode_field(field, input, depth).map_err(|e| e.within(&field.name))?;
                fields.push((field.name.clone(), value));
            }
            Ok(DynamicValue::Struct(fields))
        }
    }
}

fn decode_field<D: BinaryDecoder + ?Sized>(
    field: &FieldDescriptor,
    input: &mut D,
    depth: usize,
) -> Result<DynamicValue, DecodeError> {
    if !field.array {
        return decode_element(&field.field_type, input, depth);
    }

    // Null array (-1) reads as empty
    let len = input.read_array_length()?.unwrap_or(0);

    // Reject counts the remaining input cannot hold before allocating.
    // Zero-width elements (empty structs) consume nothing, so only the
    // explicit cap bounds them.
    match min_encoded_size(&field.field_type) {
        0 if len > MAX_ZERO_WIDTH_ARRAY_LEN => {
            return Err(DecodeErrorKind::InvalidLength(len as i32).into());
        }
        0 => {}
        size => {
            let need = len.saturating_mul(size);
            if need > input.remaining() {
                return Err(DecodeErrorKind::EndOfStream {
                    need,
                    have: input.remaining(),
                }
                .into());
            }
        }
    }

    let mut items = Vec::with_capacity(len);
    for index in 0..len {
        let item = decode_element(&field.field_type, input, depth)
            .map_err(|e| e.within(&format!("[{}]", index)))?;
        items.push(item);
    }
    Ok(DynamicValue::Array(items))
}

fn decode_element<D: BinaryDecoder + ?Sized>(
    field_type: &FieldType,
    input: &mut D,
    depth: usize,
) -> Result<DynamicValue, DecodeError> {
    match field_type {
        FieldType::Primitive(p) => decode_primitive(*p, input),
        FieldType::Reference(target) => decode_value(target, input, depth + 1),
    }
}

fn decode_enum<D: BinaryDecoder + ?Sized>(
    desc: &EnumDescriptor,
    input: &mut D,
) -> Result<DynamicValue, DecodeError> {
    let value = input.read_int32()?;
    let literal = desc.literal_by_value(value).map(|l| l.name.clone());
    Ok(DynamicValue::Enum { value, literal })
}

fn decode_primitive<D: BinaryDecoder + ?Sized>(
    kind: PrimitiveKind,
    input: &mut D,
) -> Result<DynamicValue, DecodeError> {
    Ok(match kind {
        PrimitiveKind::String => DynamicValue::String(input.read_string()?),
        PrimitiveKind::Boolean => DynamicValue::Boolean(input.read_boolean()?),
        PrimitiveKind::LocalizedText => DynamicValue::LocalizedText(input.read_localized_text()?),
        PrimitiveKind::UInt32 => DynamicValue::UInt32(input.read_uint32()?),
        PrimitiveKind::DateTime => DynamicValue::DateTime(input.read_date_time()?),
        PrimitiveKind::Int32 => DynamicValue::Int32(input.read_int32()?),
    })
}

/// Fewest bytes one element of `field_type` can occupy.
fn min_encoded_size(field_type: &FieldType) -> usize {
    match field_type {
        // String/LocalizedText minimum: length prefix / mask byte
        FieldType::Primitive(PrimitiveKind::String) => 4,
        FieldType::Primitive(PrimitiveKind::LocalizedText) => 1,
        FieldType::Primitive(p) => p.size().unwrap_or(1),
        FieldType::Reference(target) => match &target.kind {
            TypeKind::Enum(_) => 4,
            TypeKind::Struct(s) => s
                .fields()
                .iter()
                .map(|f| {
                    if f.array {
                        4
                    } else {
                        min_encoded_size(&f.field_type)
                    }
                })
                .sum(),
        },
    }
}
