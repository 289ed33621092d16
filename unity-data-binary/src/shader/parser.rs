//! Shader projection

use super::types::{Shader, ShaderApi, ShaderPass, ShaderProgram, ShaderStage, SubShader};
use crate::error::{BinaryError, Result};
use crate::random_access::RandomAccessReader;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Keyword names by index
type KeywordTable = HashMap<i64, String>;

impl Shader {
    /// Project a Shader object.
    ///
    /// Shaders serialized before `m_ParsedForm` existed have no sub-shader
    /// information and project with empty `sub_shaders` and `keywords`.
    pub fn read(reader: &RandomAccessReader<'_>) -> Result<Self> {
        let decompressed_size = decompressed_size(reader)?;

        let Some(parsed) = reader.try_field("m_ParsedForm")? else {
            return Ok(Self {
                name: reader.field("m_Name")?.value()?,
                decompressed_size,
                keywords: Vec::new(),
                sub_shaders: Vec::new(),
            });
        };

        // Unity 2021.2+ keeps one keyword table for the whole shader
        let global_keywords = match parsed.try_field("m_KeywordNames")? {
            Some(names) => Some(keyword_table_from_names(&names)?),
            None => None,
        };

        let mut keywords = IndexSet::new();
        let mut sub_shaders = Vec::new();
        for sub_shader in parsed.field("m_SubShaders")?.elements()? {
            let sub_shader = sub_shader?;
            let mut passes = Vec::new();
            for pass in sub_shader.field("m_Passes")?.elements()? {
                let pass = pass?;
                let local_keywords;
                let table = match &global_keywords {
                    Some(table) => table,
                    None => {
                        local_keywords = keyword_table_from_name_indices(&pass.field("m_NameIndices")?)?;
                        &local_keywords
                    }
                };
                let pass = read_pass(&pass, table)?;
                for program in pass.programs.values().flatten() {
                    keywords.extend(program.keywords.iter().cloned());
                }
                passes.push(pass);
            }
            sub_shaders.push(SubShader { passes });
        }

        Ok(Self {
            name: parsed.field("m_Name")?.value()?,
            decompressed_size,
            keywords: keywords.into_iter().collect(),
            sub_shaders,
        })
    }
}

fn read_pass(pass: &RandomAccessReader<'_>, keywords: &KeywordTable) -> Result<ShaderPass> {
    let mut programs: IndexMap<ShaderApi, Vec<ShaderProgram>> = IndexMap::new();
    for (field, stage) in ShaderStage::PASS_FIELDS {
        let Some(program) = pass.try_field(field)? else {
            continue;
        };
        for sub_program in program.field("m_SubPrograms")?.elements()? {
            let program = read_sub_program(&sub_program?, stage, keywords)?;
            programs.entry(program.api).or_default().push(program);
        }
    }

    Ok(ShaderPass {
        name: pass.get("m_State/m_Name")?.value()?,
        programs,
    })
}

fn read_sub_program(
    sub_program: &RandomAccessReader<'_>,
    stage: ShaderStage,
    keywords: &KeywordTable,
) -> Result<ShaderProgram> {
    let mut indices = Vec::new();
    match sub_program.try_field("m_KeywordIndices")? {
        Some(list) => indices.extend(integer_elements(&list)?),
        None => {
            indices.extend(integer_elements(&sub_program.field("m_GlobalKeywordIndices")?)?);
            indices.extend(integer_elements(&sub_program.field("m_LocalKeywordIndices")?)?);
        }
    }

    let names = indices
        .into_iter()
        .map(|index| {
            keywords.get(&index).cloned().ok_or_else(|| {
                BinaryError::invalid_data(format!("shader keyword index {} is not named", index))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ShaderProgram {
        api: ShaderApi::from(sub_program.field("m_GpuProgramType")?.as_i64()? as i32),
        stage,
        blob_index: sub_program.field("m_BlobIndex")?.as_u32()?,
        hw_tier: sub_program.field("m_ShaderHardwareTier")?.as_i64()? as i32,
        keywords: names,
    })
}

fn integer_elements(list: &RandomAccessReader<'_>) -> Result<Vec<i64>> {
    list.elements()?
        .map(|element| element.and_then(|e| e.as_i64()))
        .collect()
}

fn keyword_table_from_names(names: &RandomAccessReader<'_>) -> Result<KeywordTable> {
    names
        .elements()?
        .enumerate()
        .map(|(index, name)| -> Result<(i64, String)> {
            Ok((index as i64, name?.value::<String>()?))
        })
        .collect()
}

/// Invert a pass's `m_NameIndices` map of name to index
fn keyword_table_from_name_indices(map: &RandomAccessReader<'_>) -> Result<KeywordTable> {
    map.elements()?
        .map(|pair| -> Result<(i64, String)> {
            let pair = pair?;
            let name: String = pair.field("first")?.value()?;
            Ok((pair.field("second")?.as_i64()?, name))
        })
        .collect()
}

/// Sum of `decompressedLengths` (flat or per platform) or `decompressedSize`
fn decompressed_size(reader: &RandomAccessReader<'_>) -> Result<u64> {
    for name in ["decompressedLengths", "decompressedSize"] {
        if let Some(field) = reader.try_field(name)? {
            return sum_numbers(&field);
        }
    }
    Err(BinaryError::field_not_found("decompressedSize", reader.type_name()))
}

fn sum_numbers(reader: &RandomAccessReader<'_>) -> Result<u64> {
    if !reader.node().is_array_like() {
        return Ok(reader.as_i64()? as u64);
    }
    let mut total = 0u64;
    for element in reader.elements()? {
        total += sum_numbers(&element?)?;
    }
    Ok(total)
}
