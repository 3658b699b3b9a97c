use anyhow::{anyhow, Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;

const GZIP_MAGIC: [u8; 3] = [0x1F, 0x8B, 0x08];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    Gzip,
    Zstd,
    Plain,
}

fn detect(head: &[u8]) -> Compression {
    if head.starts_with(&GZIP_MAGIC) {
        Compression::Gzip
    } else if head.starts_with(&ZSTD_MAGIC) {
        Compression::Zstd
    } else {
        Compression::Plain
    }
}

/// Wrap a reader so gzip and zstd streams are decompressed transparently.
/// Detection uses the first four bytes, which are put back in front.
pub fn maybe_decompress<R: Read + Send + 'static>(mut reader: R) -> io::Result<Box<dyn Read + Send>> {
    let mut head = [0u8; 4];
    let mut filled = 0;
    while filled < head.len() {
        let n = reader.read(&mut head[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    let prefix = Cursor::new(head[..filled].to_vec());
    let chained = prefix.chain(reader);

    Ok(match detect(&head[..filled]) {
        Compression::Gzip => Box::new(MultiGzDecoder::new(chained)),
        Compression::Zstd => Box::new(zstd::Decoder::new(chained)?),
        Compression::Plain => Box::new(chained),
    })
}

/// Open an input source for line reading; `-` is stdin
pub fn open_input(source: &str) -> Result<Box<dyn BufRead + Send>> {
    if source == "-" {
        let reader = maybe_decompress(io::stdin())
            .map_err(|e| anyhow!("Failed to detect compression format of stdin: {}", e))?;
        return Ok(Box::new(BufReader::new(reader)));
    }

    let path = Path::new(source);
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        if extension.eq_ignore_ascii_case("zip") {
            return Err(anyhow!(
                "ZIP archives are not supported, only gzip and zstd. Extract it first: unzip {}",
                path.display()
            ));
        }
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = maybe_decompress(file)
        .with_context(|| format!("Failed to detect compression format of {}", path.display()))?;
    Ok(Box::new(BufReader::new(reader)))
}
