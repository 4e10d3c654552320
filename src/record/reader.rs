//! Streaming reader for VCF files.

use std::{io::BufRead, path::Path};

use noodles_vcf as vcf;

use crate::common::io::open_read_maybe_gz;

use super::VcfRecord;

/// Reads `VcfRecord`s below the header of a VCF file.
///
/// Comment lines between records, such as the audit lines of a merged callset,
/// are skipped.
pub struct VcfReader<R> {
    inner: vcf::Reader<R>,
    header: vcf::Header,
    line: String,
    line_no: usize,
}

impl VcfReader<Box<dyn BufRead>> {
    /// Open the (possibly gzip-compressed) file at `path` and read its header.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let reader = open_read_maybe_gz(path.as_ref()).map_err(|e| {
            anyhow::anyhow!("could not open {:?} for reading: {}", path.as_ref(), e)
        })?;
        Self::new(reader)
            .map_err(|e| anyhow::anyhow!("problem with {:?}: {}", path.as_ref(), e))
    }
}

impl<R: BufRead> VcfReader<R> {
    /// Wrap `reader` and read the VCF header from it.
    pub fn new(reader: R) -> Result<Self, anyhow::Error> {
        let mut inner = vcf::Reader::new(reader);
        let header = inner
            .read_header()
            .map_err(|e| anyhow::anyhow!("problem reading VCF header: {}", e))?;
        Ok(Self {
            inner,
            header,
            line: String::new(),
            line_no: 0,
        })
    }

    pub fn header(&self) -> &vcf::Header {
        &self.header
    }

    /// Read the next record, `None` at the end of the input.
    pub fn read_record(&mut self) -> Result<Option<VcfRecord>, anyhow::Error> {
        loop {
            self.line.clear();
            if self.inner.get_mut().read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.line.trim_end_matches(['\n', '\r']);
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let record = vcf::Record::try_from_str(line, &self.header).map_err(|e| {
                anyhow::anyhow!("invalid record in data line {}: {}", self.line_no, e)
            })?;
            return Ok(Some(VcfRecord::from_vcf(&record, line)));
        }
    }
}

impl<R: BufRead> Iterator for VcfReader<R> {
    type Item = Result<VcfRecord, anyhow::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::VcfReader;

    #[test]
    fn read_example() -> Result<(), anyhow::Error> {
        let reader = VcfReader::from_path("tests/record/example.vcf")?;
        assert_eq!(reader.header().infos().len(), 2);
        let records = reader.collect::<Result<Vec<_>, _>>()?;

        assert_eq!(records.len(), 3);
        assert_eq!(
            records
                .iter()
                .map(|record| format!("{}:{}", record.chrom, record.pos))
                .collect::<Vec<_>>(),
            vec!["1:100", "1:1000", "2:5000"]
        );
        assert_eq!(records[1].alternates, vec!["G", "T"]);
        assert_eq!(records[2].info.get_str("SVTYPE"), Some("BND"));
        assert_eq!(records[2].alternates, vec!["N[3:1200["]);
        assert_eq!(
            records[0].to_string(),
            "1\t100\tsv1\tN\t<DEL>\t30\tPASS\tSVTYPE=DEL;END=500\tGT\t0/1"
        );

        Ok(())
    }

    #[test]
    fn read_gz_same_as_plain() -> Result<(), anyhow::Error> {
        let plain = VcfReader::from_path("tests/record/example.vcf")?
            .collect::<Result<Vec<_>, _>>()?;
        let gz = VcfReader::from_path("tests/record/example.vcf.gz")?
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(plain, gz);

        Ok(())
    }

    #[test]
    fn skips_comment_lines() -> Result<(), anyhow::Error> {
        let input = "##fileformat=VCFv4.2\n\
                     #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
                     1\t100\t.\tA\tC\t.\tPASS\t.\n\
                     #1\t100\t.\tA\tC\t.\tPASS\t. (a)\n\
                     1\t200\t.\tA\tG\t.\tPASS\t.\n";
        let records = VcfReader::new(input.as_bytes())?.collect::<Result<Vec<_>, _>>()?;

        assert_eq!(
            records.iter().map(|record| record.pos).collect::<Vec<_>>(),
            vec![100, 200]
        );

        Ok(())
    }

    #[test]
    fn broken_record_is_an_error() -> Result<(), anyhow::Error> {
        let input = "##fileformat=VCFv4.2\n\
                     #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
                     1\t100\t.\tA\tC\t.\tPASS\t.\n\
                     1\tabc\t.\tA\tC\t.\t.\t.\n";
        let mut reader = VcfReader::new(input.as_bytes())?;

        assert!(matches!(reader.next(), Some(Ok(_))));
        assert!(matches!(reader.next(), Some(Err(_))));

        Ok(())
    }

    #[test]
    fn missing_file() {
        assert!(VcfReader::from_path("tests/record/does-not-exist.vcf").is_err());
    }
}
