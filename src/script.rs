//! Second interpreter of a [`RuleSet`]: the SQL*Plus script whose HTML spool
//! is the report the converter reads back.
//!
//! Each sheet becomes `rem [<name>]` followed by its query, so the spool
//! carries the markers the table extractor looks for.

use crate::error::AwrSheetError;
use crate::options::ScriptOptions;
use crate::rules::RuleSet;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

const BIND_VARIABLES: &str = "\
Prompt ############### Define Date : YYYYMMDDHH24MI #################################
var snapdate_from number
exec :snapdate_from:={from}
var snapdate_to number
exec :snapdate_to:={to}
Prompt ##############################################################################
var inst_no number
var snap_fr number
var snap_to number
var inst_no1 number
var inst_no2 number
var inst_no3 number
var inst_no4 number
var inst_no5 number
var inst_no6 number
var dbid number
exec select instance_number into :inst_no from v$instance;
exec SELECT NVL(MAX(SNAP_ID),1)+1 into :snap_fr FROM DBA_HIST_SNAPSHOT WHERE BEGIN_INTERVAL_TIME<=TO_DATE(:snapdate_from,'YYYYMMDDHH24MI') and dbid in (select dbid  from v$database);
exec SELECT NVL(MAX(SNAP_ID),1)+1 SNAP_TO into :snap_to FROM DBA_HIST_SNAPSHOT WHERE END_INTERVAL_TIME<=TO_DATE(:snapdate_to,'YYYYMMDDHH24MI') and dbid in (select dbid  from v$database);
exec SELECT dbid into :dbid from v$database;
exec :inst_no1:=1
exec :inst_no2:=2
exec :inst_no3:=3
exec :inst_no4:=4
exec :inst_no5:=5
exec :inst_no6:=6
print :snap_fr
print :snap_to
print :dbid
print :inst_no
set markup html on
set linesize 32767 trimspool on
set pages 50000
set feedback off
set termout off
set echo off
";

const SPOOL_SETUP: &str = "\
prompt SQL>
set linesize 1000 pagesize 9999 trimspool on
set termout off time off
set sqlprompt \"SQL> \"
alter session set nls_date_format='RR/MM/DD HH24:MI';
column report_name   new_value report_name   format a30;
select 'AWR_' || host_name || '_' || instance_name|| '_'|| to_char(sysdate, 'yyyymmdd_hh24mi') || '.html' report_name from v$instance;
set echo on
set markup html on
spool &report_name
";

/// Renders the script for `rules`.
pub fn generate_script(rules: &RuleSet, options: &ScriptOptions) -> String {
    let mut script = BIND_VARIABLES
        .replace("{from}", &options.snapshot_from.to_string())
        .replace("{to}", &options.snapshot_to.to_string());
    script.push_str(SPOOL_SETUP);
    writeln!(script, "rem INI_NAME={}", options.rules_name).ok();
    for sheet in &rules.sheets {
        writeln!(script, "rem [{}]", sheet.name).ok();
        for line in &sheet.query {
            writeln!(script, "{line}").ok();
        }
        script.push_str(";\n");
    }
    script.push_str("exit;\n");
    script
}

/// Writes the script next to its final location and renames it into place.
pub fn write_script(path: &Path, script: &str) -> Result<(), AwrSheetError> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(script.as_bytes())?;
    file.flush()?;
    file.persist(path)?;
    info!(path = %path.display(), bytes = script.len(), "saved script");
    Ok(())
}
