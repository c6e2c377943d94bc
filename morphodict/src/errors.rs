//! エラー型の定義

/// エラー型を[`MorphoDictError`]に固定したResult型
pub type Result<T, E = MorphoDictError> = std::result::Result<T, E>;

/// 辞書の構築、永続化、検索で発生するエラー
#[derive(Debug, thiserror::Error)]
pub enum MorphoDictError {
    /// 呼び出し側から渡された値が不正
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// レコードや規則ファイルなどの入力が不正
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 構築の段階に反する操作や、壊れたスナップショット
    #[error(transparent)]
    InvalidState(InvalidStateError),

    /// 品詞タグが既知の閉じた集合に含まれない
    ///
    /// 符号化時に発生し、読み込み全体を中断します。
    #[error("Unknown type annotation: {0:?}")]
    UnknownTypeAnnotation(String),

    /// 混合基数の桁があふれる
    ///
    /// `table`に割り当てるインデックスが`limit`に達した時点で発生します。
    #[error("Capacity overflow: the {table} table cannot hold more than {limit} entries")]
    CapacityOverflow {
        /// あふれたテーブルの名前
        table: &'static str,
        /// 割り当て可能なインデックスの上限
        limit: u64,
    },

    /// 参照先がさらに参照になっている
    ///
    /// エイリアスは必ず1段で解決できなければなりません。
    #[error("Reference {key:?} points to {target:?}, which is itself a reference")]
    ChainedReference {
        /// 参照エントリのキー
        key: String,
        /// 参照先のキー
        target: String,
    },

    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    /// JSONレコードのパースエラー
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// アクセント規則の正規表現エラー
    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// スナップショットの検証やシリアライズのエラー
    #[error(transparent)]
    RkyvError(#[from] rkyv::rancor::Error),
}

impl MorphoDictError {
    /// `arg`は不正だった引数の名前です。
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// `arg`は入力の種類(`"record"`、`"accent rules"`など)です。
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_state<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }

    pub(crate) fn chained_reference<K, T>(key: K, target: T) -> Self
    where
        K: Into<String>,
        T: Into<String>,
    {
        Self::ChainedReference {
            key: key.into(),
            target: target.into(),
        }
    }
}

/// [`MorphoDictError::InvalidArgument`]の詳細
#[derive(Debug, thiserror::Error)]
#[error("InvalidArgumentError: {arg}: {msg}")]
pub struct InvalidArgumentError {
    pub(crate) arg: &'static str,
    pub(crate) msg: String,
}

/// [`MorphoDictError::InvalidFormat`]の詳細
#[derive(Debug, thiserror::Error)]
#[error("InvalidFormatError: {arg}: {msg}")]
pub struct InvalidFormatError {
    pub(crate) arg: &'static str,
    pub(crate) msg: String,
}

/// [`MorphoDictError::InvalidState`]の詳細
#[derive(Debug, thiserror::Error)]
#[error("InvalidStateError: {msg}: {cause}")]
pub struct InvalidStateError {
    pub(crate) msg: String,
    pub(crate) cause: String,
}

impl InvalidFormatError {
    /// 行番号などを含むエラーメッセージ
    #[inline(always)]
    pub fn message(&self) -> &str {
        &self.msg
    }
}
