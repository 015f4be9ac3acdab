// Copyright (c) 2025 ADBC Drivers Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Arrow result for `Connection::get_info`.
//!
//! The result follows `GET_INFO_SCHEMA`: a `UInt32` info code plus a dense
//! union value. The driver only reports string values, so every row uses the
//! `string_value` child and the other children stay empty.

use crate::error::{Neo4jErrorHelper, Result};
use crate::metadata::DatabaseMetadata;
use adbc_core::options::InfoCode;
use adbc_core::schemas::GET_INFO_SCHEMA;
use arrow_array::{
    new_empty_array, ArrayRef, RecordBatch, RecordBatchIterator, StringArray, UInt32Array,
    UnionArray,
};
use arrow_schema::{ArrowError, DataType, UnionMode};
use std::collections::HashSet;
use std::sync::Arc;

/// Type id of `string_value` in the `info_value` union.
const STRING_VALUE_TYPE_ID: i8 = 0;

pub type InfoReader =
    RecordBatchIterator<std::vec::IntoIter<std::result::Result<RecordBatch, ArrowError>>>;

/// Accumulates string-valued info entries.
#[derive(Debug, Default)]
pub struct InfoBuilder {
    codes: Vec<u32>,
    values: Vec<String>,
}

impl InfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_string(&mut self, code: u32, value: impl Into<String>) {
        self.codes.push(code);
        self.values.push(value.into());
    }

    pub fn build(self) -> Result<InfoReader> {
        let schema = GET_INFO_SCHEMA.clone();
        let union_fields = match schema.field(1).data_type() {
            DataType::Union(fields, UnionMode::Dense) => fields.clone(),
            other => {
                return Err(Neo4jErrorHelper::invalid_state()
                    .message(format!("unexpected info_value type: {}", other)))
            }
        };

        let len = self.codes.len();
        let children: Vec<ArrayRef> = union_fields
            .iter()
            .map(|(type_id, field)| {
                if type_id == STRING_VALUE_TYPE_ID {
                    Arc::new(StringArray::from(self.values.clone())) as ArrayRef
                } else {
                    new_empty_array(field.data_type())
                }
            })
            .collect();

        let type_ids = vec![STRING_VALUE_TYPE_ID; len].into();
        let offsets = (0..len as i32).collect::<Vec<_>>().into();
        let values = UnionArray::try_new(union_fields, type_ids, Some(offsets), children)
            .map_err(|e| {
                Neo4jErrorHelper::invalid_state()
                    .message(format!("Failed to build info values: {}", e))
            })?;

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(UInt32Array::from(self.codes)), Arc::new(values)],
        )
        .map_err(|e| {
            Neo4jErrorHelper::invalid_state()
                .message(format!("Failed to build get_info result: {}", e))
        })?;

        Ok(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema))
    }
}

/// Info entries describing `metadata`, restricted to `codes` when given.
///
/// `VendorVersion` is only reported when the server version is known.
pub fn build_info(
    metadata: &DatabaseMetadata,
    codes: Option<&HashSet<InfoCode>>,
) -> Result<InfoReader> {
    let wanted = |code: InfoCode| codes.map_or(true, |codes| codes.contains(&code));
    let mut builder = InfoBuilder::new();

    if wanted(InfoCode::VendorName) {
        builder.add_string(
            u32::from(&InfoCode::VendorName),
            metadata.database_product_name(),
        );
    }
    if wanted(InfoCode::VendorVersion) {
        if let Some(version) = metadata.database_product_version() {
            builder.add_string(u32::from(&InfoCode::VendorVersion), version);
        }
    }
    if wanted(InfoCode::DriverName) {
        builder.add_string(u32::from(&InfoCode::DriverName), metadata.driver_name());
    }
    if wanted(InfoCode::DriverVersion) {
        builder.add_string(u32::from(&InfoCode::DriverVersion), metadata.driver_version());
    }

    builder.build()
}
