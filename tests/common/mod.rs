//! Shared helpers for building synthetic export files.
//!
//! Fixture files are assembled byte-by-byte with the same layout the decoder
//! reads: header block, master region, and one packed data region per table.
//! The classic DEPT/EMP/SALGRADE demo schema is the standard fixture.
#![allow(dead_code)]

pub const BLOCK_SIZE: u32 = 4096;
pub const VERSION_NAME: &str = "Oracle 12c Release 1: 12.1.0";
pub const CHARSET: &str = "AL32UTF8";
pub const EXPORT_DATE: &str = "Wed May 23 14:34:07 EDT 2018";

const HDR_CHECKSUM: usize = 20;
const VERSION_4_1: u16 = 0x0401;
const FLAG_MASTER_TABLE: u16 = 0x0001;
const REGION_MARKER: u16 = 0xDA7A;
const NUMBER_ZERO: u8 = 0x80;
const NUMBER_NEG_TERMINATOR: u8 = 102;

// ---------------------------------------------------------------------------
// Value slot encoders
// ---------------------------------------------------------------------------

/// Encode an integer in the packed-decimal format (exponent byte + base-100
/// digits).
pub fn encode_number(v: i64) -> Vec<u8> {
    if v == 0 {
        return vec![NUMBER_ZERO];
    }
    let negative = v < 0;
    let mut m = v.unsigned_abs();
    let mut pairs = Vec::new();
    while m > 0 {
        pairs.push((m % 100) as u8);
        m /= 100;
    }
    pairs.reverse();
    let base = pairs.len() as i32 - 1;
    while pairs.last() == Some(&0) {
        pairs.pop();
    }
    let mut out = Vec::new();
    if negative {
        out.push((62 - base) as u8);
        out.extend(pairs.iter().map(|d| 101 - d));
        out.push(NUMBER_NEG_TERMINATOR);
    } else {
        out.push((193 + base) as u8);
        out.extend(pairs.iter().map(|d| d + 1));
    }
    out
}

/// A numeric slot: one length byte + packed-decimal bytes.
pub fn number_slot(v: i64) -> Vec<u8> {
    let enc = encode_number(v);
    let mut slot = vec![enc.len() as u8];
    slot.extend(enc);
    slot
}

/// A text slot: u16 length prefix + bytes.
pub fn str_slot(s: &str) -> Vec<u8> {
    let mut slot = (s.len() as u16).to_be_bytes().to_vec();
    slot.extend(s.as_bytes());
    slot
}

/// A date slot at midnight: 7 packed bytes.
pub fn date_slot(year: i32, month: u8, day: u8) -> Vec<u8> {
    vec![
        (year / 100 + 100) as u8,
        (year % 100 + 100) as u8,
        month,
        day,
        1,
        1,
        1,
    ]
}

// ---------------------------------------------------------------------------
// Row and region packing
// ---------------------------------------------------------------------------

/// Pack one row: u16 payload length, null bitmap, then the non-null slots.
pub fn pack_row(n_cols: usize, nulls: &[usize], slots: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = vec![0u8; n_cols.div_ceil(8)];
    for &i in nulls {
        payload[i / 8] |= 1 << (i % 8);
    }
    for slot in slots {
        payload.extend(slot);
    }
    let mut row = (payload.len() as u16).to_be_bytes().to_vec();
    row.extend(payload);
    row
}

/// Pack a data region: marker, row count, payload length, packed rows.
pub fn pack_region(rows: &[Vec<u8>]) -> Vec<u8> {
    let payload: Vec<u8> = rows.iter().flatten().copied().collect();
    let mut region = REGION_MARKER.to_be_bytes().to_vec();
    region.extend((rows.len() as u32).to_be_bytes());
    region.extend((payload.len() as u32).to_be_bytes());
    region.extend(payload);
    region
}

fn blocks_for(bytes: usize, block_size: u32) -> u64 {
    (bytes as u64).div_ceil(block_size as u64).max(1)
}

fn pad_to_blocks(mut bytes: Vec<u8>, block_size: u32) -> Vec<u8> {
    let blocks = blocks_for(bytes.len(), block_size);
    bytes.resize((blocks * block_size as u64) as usize, 0);
    bytes
}

// ---------------------------------------------------------------------------
// Whole-file assembly
// ---------------------------------------------------------------------------

/// One exported object to place in a synthetic file.
pub struct ObjectSpec {
    pub name: String,
    pub kind: String,
    pub definition: String,
    /// JSON column layout; `None` for non-table kinds.
    pub schema_json: Option<String>,
    /// Packed rows (from [`pack_row`]); ignored for non-table kinds.
    pub rows: Vec<Vec<u8>>,
}

impl ObjectSpec {
    pub fn table(name: &str, schema_json: &str, rows: Vec<Vec<u8>>) -> Self {
        ObjectSpec {
            name: name.to_string(),
            kind: "TABLE".to_string(),
            definition: format!("CREATE TABLE {} (...)", name),
            schema_json: Some(schema_json.to_string()),
            rows,
        }
    }

    pub fn non_table(name: &str, kind: &str, definition: &str) -> Self {
        ObjectSpec {
            name: name.to_string(),
            kind: kind.to_string(),
            definition: definition.to_string(),
            schema_json: None,
            rows: Vec::new(),
        }
    }
}

/// Header/format knobs for [`build_dump_opts`].
pub struct DumpOpts {
    pub version: u16,
    pub extra_flags: u16,
    pub block_size: u32,
    pub version_name: String,
    pub charset: String,
    pub export_date: String,
}

impl Default for DumpOpts {
    fn default() -> Self {
        DumpOpts {
            version: VERSION_4_1,
            extra_flags: 0,
            block_size: BLOCK_SIZE,
            version_name: VERSION_NAME.to_string(),
            charset: CHARSET.to_string(),
            export_date: EXPORT_DATE.to_string(),
        }
    }
}

fn build_header_block(
    opts: &DumpOpts,
    flags: u16,
    master_start: u32,
    master_blocks: u32,
) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"EXPD");
    buf.extend_from_slice(&opts.version.to_be_bytes());
    buf.extend_from_slice(&flags.to_be_bytes());
    buf.extend_from_slice(&opts.block_size.to_be_bytes());
    buf.extend_from_slice(&master_start.to_be_bytes());
    buf.extend_from_slice(&master_blocks.to_be_bytes());
    buf.extend_from_slice(&0u32.to_be_bytes()); // checksum placeholder
    for s in [&opts.version_name, &opts.charset, &opts.export_date] {
        buf.extend_from_slice(&(s.len() as u16).to_be_bytes());
        buf.extend_from_slice(s.as_bytes());
    }
    let crc = crc32c::crc32c(&buf);
    buf[HDR_CHECKSUM..HDR_CHECKSUM + 4].copy_from_slice(&crc.to_be_bytes());
    buf.resize(opts.block_size as usize, 0);
    buf
}

/// Pack one master-table row describing `obj` whose data (if any) sits at
/// `data_start` for `data_blocks` blocks.
fn master_row(obj: &ObjectSpec, data_start: Option<u64>, data_blocks: Option<u64>) -> Vec<u8> {
    let mut slots = vec![str_slot(&obj.name), str_slot(&obj.kind), str_slot(&obj.definition)];
    let mut nulls = Vec::new();
    match &obj.schema_json {
        Some(doc) => slots.push(str_slot(doc)),
        None => nulls.push(3),
    }
    match data_start {
        Some(s) => slots.push(number_slot(s as i64)),
        None => nulls.push(4),
    }
    match data_blocks {
        Some(b) => slots.push(number_slot(b as i64)),
        None => nulls.push(5),
    }
    pack_row(6, &nulls, &slots)
}

/// Assemble a complete export file image with the given objects.
///
/// Layout: header at block 0, master region at block 1, data regions packed
/// after the master in object order.
pub fn build_dump_opts(objects: &[ObjectSpec], opts: &DumpOpts) -> Vec<u8> {
    let regions: Vec<Option<Vec<u8>>> = objects
        .iter()
        .map(|o| {
            o.schema_json
                .as_ref()
                .map(|_| pack_region(&o.rows))
        })
        .collect();

    // The master's own block count shifts the data start blocks, which can
    // in turn change the master's encoded size; settle on a fixed point.
    let mut master_blocks = 1u64;
    let (master_region, placements) = loop {
        let mut next_block = 1 + master_blocks;
        let mut placements = Vec::new();
        for region in &regions {
            match region {
                Some(bytes) => {
                    let blocks = blocks_for(bytes.len(), opts.block_size);
                    placements.push(Some((next_block, blocks)));
                    next_block += blocks;
                }
                None => placements.push(None),
            }
        }
        let rows: Vec<Vec<u8>> = objects
            .iter()
            .zip(&placements)
            .map(|(obj, placed)| {
                let (start, blocks) = match placed {
                    Some((s, b)) => (Some(*s), Some(*b)),
                    None => (None, None),
                };
                master_row(obj, start, blocks)
            })
            .collect();
        let master_region = pack_region(&rows);
        let needed = blocks_for(master_region.len(), opts.block_size);
        if needed == master_blocks {
            break (master_region, placements);
        }
        master_blocks = needed;
    };

    let mut file = build_header_block(
        opts,
        FLAG_MASTER_TABLE | opts.extra_flags,
        1,
        master_blocks as u32,
    );
    file.extend(pad_to_blocks(master_region, opts.block_size));
    for (region, placed) in regions.into_iter().zip(placements) {
        if let (Some(bytes), Some(_)) = (region, placed) {
            file.extend(pad_to_blocks(bytes, opts.block_size));
        }
    }
    file
}

pub fn build_dump(objects: &[ObjectSpec]) -> Vec<u8> {
    build_dump_opts(objects, &DumpOpts::default())
}

// ---------------------------------------------------------------------------
// The DEPT/EMP/SALGRADE fixture
// ---------------------------------------------------------------------------

pub const DEPT_SCHEMA: &str = r#"{"name":"DEPT","columns":[
 {"name":"DEPTNO","type":"NUMBER","precision":2,"scale":0,"nullable":false,"position":0},
 {"name":"DNAME","type":"VARCHAR2","length":14,"position":1},
 {"name":"LOC","type":"VARCHAR2","length":13,"position":2}]}"#;

pub const EMP_SCHEMA: &str = r#"{"name":"EMP","columns":[
 {"name":"EMPNO","type":"NUMBER","precision":4,"scale":0,"nullable":false,"position":0},
 {"name":"ENAME","type":"VARCHAR2","length":10,"position":1},
 {"name":"JOB","type":"VARCHAR2","length":9,"position":2},
 {"name":"MGR","type":"NUMBER","precision":4,"scale":0,"position":3},
 {"name":"HIREDATE","type":"DATE","position":4},
 {"name":"SAL","type":"NUMBER","precision":7,"scale":2,"position":5},
 {"name":"COMM","type":"NUMBER","precision":7,"scale":2,"position":6},
 {"name":"DEPTNO","type":"NUMBER","precision":2,"scale":0,"position":7}]}"#;

pub const SALGRADE_SCHEMA: &str = r#"{"name":"SALGRADE","columns":[
 {"name":"GRADE","type":"NUMBER","precision":2,"scale":0,"nullable":false,"position":0},
 {"name":"LOSAL","type":"NUMBER","precision":7,"scale":2,"position":1},
 {"name":"HISAL","type":"NUMBER","precision":7,"scale":2,"position":2}]}"#;

pub fn dept_rows() -> Vec<Vec<u8>> {
    [
        (10, "ACCOUNTING", "NEW YORK"),
        (20, "RESEARCH", "DALLAS"),
        (30, "SALES", "CHICAGO"),
        (40, "OPERATIONS", "BOSTON"),
    ]
    .iter()
    .map(|(no, dname, loc)| {
        pack_row(3, &[], &[number_slot(*no), str_slot(dname), str_slot(loc)])
    })
    .collect()
}

struct EmpRow {
    empno: i64,
    ename: &'static str,
    job: &'static str,
    mgr: Option<i64>,
    hiredate: (i32, u8, u8),
    sal: i64,
    comm: Option<i64>,
    deptno: i64,
}

const EMP_DATA: &[EmpRow] = &[
    EmpRow { empno: 7369, ename: "SMITH", job: "CLERK", mgr: Some(7902), hiredate: (1980, 12, 17), sal: 800, comm: None, deptno: 20 },
    EmpRow { empno: 7499, ename: "ALLEN", job: "SALESMAN", mgr: Some(7698), hiredate: (1981, 2, 20), sal: 1600, comm: Some(300), deptno: 30 },
    EmpRow { empno: 7521, ename: "WARD", job: "SALESMAN", mgr: Some(7698), hiredate: (1981, 2, 22), sal: 1250, comm: Some(500), deptno: 30 },
    EmpRow { empno: 7566, ename: "JONES", job: "MANAGER", mgr: Some(7839), hiredate: (1981, 4, 2), sal: 2975, comm: None, deptno: 20 },
    EmpRow { empno: 7654, ename: "MARTIN", job: "SALESMAN", mgr: Some(7698), hiredate: (1981, 9, 28), sal: 1250, comm: Some(1400), deptno: 30 },
    EmpRow { empno: 7698, ename: "BLAKE", job: "MANAGER", mgr: Some(7839), hiredate: (1981, 5, 1), sal: 2850, comm: None, deptno: 30 },
    EmpRow { empno: 7782, ename: "CLARK", job: "MANAGER", mgr: Some(7839), hiredate: (1981, 6, 9), sal: 2450, comm: None, deptno: 10 },
    EmpRow { empno: 7788, ename: "SCOTT", job: "ANALYST", mgr: Some(7566), hiredate: (1987, 4, 19), sal: 3000, comm: None, deptno: 20 },
    EmpRow { empno: 7839, ename: "KING", job: "PRESIDENT", mgr: None, hiredate: (1981, 11, 17), sal: 5000, comm: None, deptno: 10 },
    EmpRow { empno: 7844, ename: "TURNER", job: "SALESMAN", mgr: Some(7698), hiredate: (1981, 9, 8), sal: 1500, comm: Some(0), deptno: 30 },
    EmpRow { empno: 7876, ename: "ADAMS", job: "CLERK", mgr: Some(7788), hiredate: (1987, 5, 23), sal: 1100, comm: None, deptno: 20 },
    EmpRow { empno: 7900, ename: "JAMES", job: "CLERK", mgr: Some(7698), hiredate: (1981, 12, 3), sal: 950, comm: None, deptno: 30 },
    EmpRow { empno: 7902, ename: "FORD", job: "ANALYST", mgr: Some(7566), hiredate: (1981, 12, 3), sal: 3000, comm: None, deptno: 20 },
    EmpRow { empno: 7934, ename: "MILLER", job: "CLERK", mgr: Some(7782), hiredate: (1982, 1, 23), sal: 1300, comm: None, deptno: 10 },
];

pub fn emp_rows() -> Vec<Vec<u8>> {
    EMP_DATA
        .iter()
        .map(|e| {
            let mut slots = vec![
                number_slot(e.empno),
                str_slot(e.ename),
                str_slot(e.job),
            ];
            let mut nulls = Vec::new();
            match e.mgr {
                Some(m) => slots.push(number_slot(m)),
                None => nulls.push(3),
            }
            slots.push(date_slot(e.hiredate.0, e.hiredate.1, e.hiredate.2));
            slots.push(number_slot(e.sal));
            match e.comm {
                Some(c) => slots.push(number_slot(c)),
                None => nulls.push(6),
            }
            slots.push(number_slot(e.deptno));
            pack_row(8, &nulls, &slots)
        })
        .collect()
}

pub fn salgrade_rows() -> Vec<Vec<u8>> {
    [
        (1, 700, 1200),
        (2, 1201, 1400),
        (3, 1401, 2000),
        (4, 2001, 3000),
        (5, 3001, 9999),
    ]
    .iter()
    .map(|(g, lo, hi)| {
        pack_row(3, &[], &[number_slot(*g), number_slot(*lo), number_slot(*hi)])
    })
    .collect()
}

/// The standard fixture: DEPT, EMP, SALGRADE plus an index and a sequence
/// entry in the master table.
pub fn scott_objects() -> Vec<ObjectSpec> {
    vec![
        ObjectSpec::table("DEPT", DEPT_SCHEMA, dept_rows()),
        ObjectSpec::table("EMP", EMP_SCHEMA, emp_rows()),
        ObjectSpec::table("SALGRADE", SALGRADE_SCHEMA, salgrade_rows()),
        ObjectSpec::non_table("PK_DEPT", "INDEX", "CREATE UNIQUE INDEX PK_DEPT ON DEPT (DEPTNO)"),
        ObjectSpec::non_table("EMPSEQ", "SEQUENCE", "CREATE SEQUENCE EMPSEQ START WITH 8000"),
    ]
}

pub fn scott_dump() -> Vec<u8> {
    build_dump(&scott_objects())
}
