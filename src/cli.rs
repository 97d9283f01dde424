use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "account-ui")]
#[command(about = "アカウント画面のバックエンドAPIを操作するCLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// フォルダ内の写真をアップロード
    Upload {
        /// 写真フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// アップロード先URL（省略時は設定値）
        #[arg(short, long)]
        endpoint: Option<String>,

        /// CSRFトークン（ヘッダーとクッキーの両方で送る）
        #[arg(long)]
        csrf_token: Option<String>,

        /// 確認をスキップ
        #[arg(short, long)]
        yes: bool,
    },

    /// 電話番号が登録済みか確認
    CheckPhone {
        /// 電話番号
        #[arg(required = true)]
        number: String,

        /// 電話番号確認APIのベースURL（省略時はサーバー設定から組み立てる）
        #[arg(long)]
        base_url: Option<String>,
    },

    /// 住所を検索
    SearchAddress {
        /// 検索語（3文字以上）
        #[arg(required = true)]
        query: String,

        /// 最大件数
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// 座標から住所を逆引き
    Reverse {
        /// 緯度
        #[arg(allow_hyphen_values = true)]
        lat: f64,

        /// 経度
        #[arg(allow_hyphen_values = true)]
        lon: f64,
    },

    /// 会社住所を座標に変換（Nominatim）
    Geocode {
        #[arg(long)]
        address: String,

        #[arg(long)]
        postal_code: String,

        #[arg(long)]
        city: String,
    },

    /// パスワードの条件をチェック
    CheckPassword {
        #[arg(required = true)]
        password: String,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// サーバーURLを設定
        #[arg(long)]
        set_server: Option<String>,

        /// アップロード先を設定
        #[arg(long)]
        set_upload_endpoint: Option<String>,
    },
}
