//! Fixed prompts for table extraction.

/// System instruction sent with every extraction request.
pub const SYSTEM_PROMPT: &str = "You are a data extraction assistant specialized in extracting \
tabular data from images. Extract all data into a structured format with columns and rows.";

/// User instruction that accompanies the image.
pub const EXTRACTION_PROMPT: &str = "Extract the table data from this image. Identify the \
column headers first, then extract each row of data. Return the data as a JSON object with a \
'columns' array listing all column names, and a 'rows' array of objects where each object has \
keys matching the column names and values from the table cells.";
