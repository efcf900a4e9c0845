// SPDX-License-Identifier: GPL-3.0-or-later
//
// autominter
// Copyright (C) 2025  Nikita Podvirnyi <krypt0nn@vk.com>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

/// Default base URL of the PreTrillions API.
pub const API_URL: &str = "https://www.pretrillions.com/api";

/// Default address of the PlasmaGirl NFT contract.
pub const CONTRACT_ADDRESS: &str = "0xC5c28aA8DA13588CBf8B23D9c57FB2DA98aebcE0";

/// Browser user agent sent with every API request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:142.0) Gecko/20100101 Firefox/142.0";

/// Symbol of the chain's native currency.
pub const NATIVE_SYMBOL: &str = "XPL";

/// Default delay between rounds in milliseconds.
pub const ROUND_DELAY_MS: u64 = 1000;

/// Default amount of credits at which the low credits warning is shown.
pub const LOW_CREDITS: i64 = 10;
