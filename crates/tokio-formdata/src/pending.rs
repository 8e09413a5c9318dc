//! 保存待ちファイルの追跡
//!
//! デコード 1 回ごとに [`PendingWrites`] を作り、そのデコード中に発行した書き込みだけを待つ。
//! 複数のデコードが同時に走っても互いの完了待ちに干渉しない。

use std::future::Future;

use tokio::task::JoinSet;

/// 書き込み対象のファイルパート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTicket {
    /// パート番号
    pub index: usize,
    /// フィールド名
    pub name: String,
    /// 保存用ファイル名
    pub stored_filename: String,
    /// パートの Content-Type
    pub content_type: String,
}

/// 完了した書き込み
#[derive(Debug)]
pub struct SettledWrite {
    pub ticket: WriteTicket,
    pub result: Result<(), String>,
}

/// デコード 1 回分の書き込み待ちの集合
#[derive(Debug, Default)]
pub struct PendingWrites {
    tickets: Vec<WriteTicket>,
    set: JoinSet<(usize, std::io::Result<()>)>,
}

impl PendingWrites {
    /// 空の集合を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 書き込みを開始して追跡対象に加える
    pub fn spawn<F>(&mut self, ticket: WriteTicket, write: F)
    where
        F: Future<Output = std::io::Result<()>> + Send + 'static,
    {
        let index = ticket.index;
        self.tickets.push(ticket);
        self.set.spawn(async move { (index, write.await) });
    }

    /// 追跡中の書き込み数
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// すべての書き込みが成功か失敗で終わるまで待つ
    ///
    /// 結果はパート番号順に並べて返す。
    /// パニックしたタスクは失敗として扱う。
    pub async fn settle(mut self) -> Vec<SettledWrite> {
        let mut results: Vec<(usize, Result<(), String>)> = Vec::with_capacity(self.tickets.len());

        while let Some(joined) = self.set.join_next().await {
            match joined {
                Ok((index, result)) => results.push((index, result.map_err(|e| e.to_string()))),
                Err(e) => tracing::error!("write task failed: {}", e),
            }
        }

        let mut settled: Vec<SettledWrite> = self
            .tickets
            .into_iter()
            .map(|ticket| {
                let result = results
                    .iter()
                    .find(|(index, _)| *index == ticket.index)
                    .map(|(_, result)| result.clone())
                    .unwrap_or_else(|| Err("write task did not complete".to_string()));
                SettledWrite { ticket, result }
            })
            .collect();
        settled.sort_by_key(|s| s.ticket.index);
        settled
    }
}
