use crate::domain::ports::ReceiptSink;
use crate::domain::receipt::Receipt;
use crate::error::Result;
use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// Collects receipts in memory. Clones share the same buffer.
#[derive(Default, Clone)]
pub struct InMemoryReceiptSink {
    receipts: Arc<RwLock<Vec<Receipt>>>,
}

impl InMemoryReceiptSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn receipts(&self) -> Vec<Receipt> {
        self.receipts.read().await.clone()
    }
}

#[async_trait]
impl ReceiptSink for InMemoryReceiptSink {
    async fn emit(&self, receipt: Receipt) -> Result<()> {
        self.receipts.write().await.push(receipt);
        Ok(())
    }
}

/// Reports receipts as structured log events only.
#[derive(Default, Clone, Copy)]
pub struct LogReceiptSink;

#[async_trait]
impl ReceiptSink for LogReceiptSink {
    async fn emit(&self, receipt: Receipt) -> Result<()> {
        info!(
            receipt_id = %receipt.id,
            station_id = %receipt.station_id,
            items = receipt.items.len(),
            total = %receipt.total,
            method = %receipt.method,
            "receipt issued"
        );
        Ok(())
    }
}

/// Writes each receipt as one JSON document per line.
pub struct JsonLinesReceiptSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesReceiptSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W: Write + Send> ReceiptSink for JsonLinesReceiptSink<W> {
    async fn emit(&self, receipt: Receipt) -> Result<()> {
        let mut writer = self.writer.lock().await;
        serde_json::to_writer(&mut *writer, &receipt)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
