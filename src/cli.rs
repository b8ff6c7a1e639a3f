use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meme-gen")]
#[command(about = "画像と説明文からミーム画像を4枚生成するクライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// バックエンドのベースURL（環境変数 MEME_GEN_API_URL より優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// サーバーの稼働状態を確認
    Health,

    /// 画像をアップロードして4枚のバリエーションを生成
    Generate {
        /// 元画像 (JPG/PNG/WebP, 5MBまで)
        #[arg(required = true)]
        image: PathBuf,

        /// 変更内容（省略時は対話入力）
        #[arg(short, long)]
        description: Option<String>,

        /// 出力ディレクトリ（デフォルト: 設定値またはカレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// アップロード前に1024px以内へ縮小しJPEGで再圧縮
        #[arg(long)]
        resize: bool,

        /// 壊れた画像が1枚でもあれば失敗にする
        #[arg(long)]
        strict_decode: bool,
    },

    /// サーバーの状態を監視（Ctrl+Cで終了）
    Watch {
        /// チェック間隔（秒）
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// 設定
    Config {
        /// バックエンドURLを保存
        #[arg(long)]
        set_api_url: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
